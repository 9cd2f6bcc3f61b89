//! Production-friendly observability hooks for generation and session phases.
//!
//! ```rust
//! use pobserve::{MetricsObservabilityHooks, SafeGenerationHooks, TracingObservabilityHooks};
//!
//! let _generation_hooks = SafeGenerationHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeGenerationHooks, SafeSessionStoreHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeGenerationHooks, SafeSessionStoreHooks,
        TracingObservabilityHooks,
    };
}
