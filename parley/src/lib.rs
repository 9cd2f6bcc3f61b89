//! Unified facade over the parley workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the provider, session, and observability crates and adds a
//! [`TextService`] that runs multi-turn conversations against any supported
//! provider.
//!
//! ```rust,no_run
//! use parley::prelude::*;
//!
//! # async fn run() -> Result<(), ServiceError> {
//! let service = build_service_from_env()?;
//! let session = service.create_session(parley_session!(ollama, "gpt-oss:20b", "Be brief."))?;
//!
//! let turn = service
//!     .send_session_message(&session.id, SessionMessage::new("What is Rust?"))
//!     .await?;
//! println!("{}", turn.result.text);
//! # Ok(())
//! # }
//! ```

mod error;
mod macros;
mod service;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use pcommon;
pub use pobserve;
pub use pprovider;
pub use psession;

pub use pcommon::{BoxFuture, Clock, GenerationOptions, ManualClock, SessionId, SystemClock};
pub use pobserve::{
    MetricsObservabilityHooks, SafeGenerationHooks, SafeSessionStoreHooks,
    TracingObservabilityHooks,
};
pub use pprovider::{
    GenerationDispatcher, GenerationHooks, GenerationRequest, GenerationResult, HttpRequest,
    HttpResponse, Message, NoopGenerationHooks, ProviderAvailability, ProviderConfig,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, ProviderTransport,
    ResolvedModel, Role, SecretString, SecureCredentialManager, TokenUsage, ToolCall,
    ToolDefinition, resolve_model_id,
};
pub use psession::{
    CreateSession, EvictionReason, NoopSessionStoreHooks, SessionError, SessionErrorKind,
    SessionSnapshot, SessionStoreConfig, SessionStoreHooks, ToolOutput,
};

pub use error::ServiceError;
pub use runtime::{ParleyConfig, build_service, build_service_from_env, build_service_with_transport};
pub use service::{SessionMessage, SessionTurn, TextService};
pub use util::{
    assistant_message, parse_provider_id, session, system_message, tool_message, tool_output,
    user_message,
};
