//! Tracing-based observability hooks for generation and session store phases.
//!
//! ```rust
//! use pobserve::TracingObservabilityHooks;
//! use psession::SessionStoreHooks;
//!
//! fn accepts_store_hooks(_hooks: &dyn SessionStoreHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_store_hooks(&hooks);
//! ```

use std::time::Duration;

use pcommon::SessionId;
use pprovider::{GenerationHooks, GenerationResult, ProviderError, ProviderId};
use psession::{EvictionReason, SessionStoreHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl GenerationHooks for TracingObservabilityHooks {
    fn on_generate_start(&self, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "generation",
            event = "start",
            provider = %provider,
            model
        );
    }

    fn on_generate_success(
        &self,
        provider: ProviderId,
        model: &str,
        result: &GenerationResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "generation",
            event = "success",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            tool_calls = result.tool_calls.len(),
            input_tokens = result.usage.map(|usage| usage.input_tokens),
            output_tokens = result.usage.map(|usage| usage.output_tokens)
        );
    }

    fn on_generate_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "generation",
            event = "failure",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            status = error.status,
            error = %error
        );
    }
}

impl SessionStoreHooks for TracingObservabilityHooks {
    fn on_session_created(&self, id: &SessionId, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "session",
            event = "created",
            session_id = %id,
            provider = %provider,
            model
        );
    }

    fn on_session_deleted(&self, id: &SessionId) {
        tracing::info!(phase = "session", event = "deleted", session_id = %id);
    }

    fn on_session_evicted(&self, id: &SessionId, reason: EvictionReason) {
        tracing::warn!(
            phase = "session",
            event = "evicted",
            session_id = %id,
            reason = %reason
        );
    }
}
