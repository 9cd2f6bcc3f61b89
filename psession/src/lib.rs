//! In-memory conversation sessions with TTL and capacity eviction.
//!
//! A [`SessionStore`] is process-scoped state: build one at startup, share it
//! behind an `Arc`, and [`SessionStore::clear`] it on shutdown. Reads and
//! writes go through [`SessionHandle`]s, which also carry the per-session
//! turn lock used to serialize read, generate, append cycles.

mod error;
mod hooks;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        CreateSession, EvictionReason, SessionError, SessionErrorKind, SessionHandle,
        SessionSnapshot, SessionStore, SessionStoreConfig, SessionStoreHooks, ToolOutput,
    };
    pub use pcommon::{Clock, ManualClock, SessionId, SystemClock};
}

pub use error::{SessionError, SessionErrorKind};
pub use hooks::{EvictionReason, NoopSessionStoreHooks, SessionStoreHooks};
pub use pcommon::SessionId;
pub use store::{SessionHandle, SessionStore, TurnGuard};
pub use types::{
    CreateSession, DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_TTL, QueuedToolOutput,
    SessionSnapshot, SessionStoreConfig, ToolOutput, validate_defaults,
};
