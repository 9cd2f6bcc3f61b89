//! Metrics-based observability hooks for generation and session store phases.
//!
//! ```rust
//! use pobserve::MetricsObservabilityHooks;
//! use pprovider::GenerationHooks;
//!
//! fn accepts_generation_hooks(_hooks: &dyn GenerationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_generation_hooks(&hooks);
//! ```

use std::time::Duration;

use pcommon::SessionId;
use pprovider::{GenerationHooks, GenerationResult, ProviderError, ProviderId};
use psession::{EvictionReason, SessionStoreHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl GenerationHooks for MetricsObservabilityHooks {
    fn on_generate_start(&self, provider: ProviderId, model: &str) {
        metrics::counter!(
            "parley_generation_start_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_generate_success(
        &self,
        provider: ProviderId,
        model: &str,
        result: &GenerationResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_generation_success_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_generation_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());

        if let Some(usage) = result.usage {
            metrics::counter!(
                "parley_generation_tokens_total",
                "provider" => provider.to_string(),
                "direction" => "input"
            )
            .increment(u64::from(usage.input_tokens));
            metrics::counter!(
                "parley_generation_tokens_total",
                "provider" => provider.to_string(),
                "direction" => "output"
            )
            .increment(u64::from(usage.output_tokens));
        }
    }

    fn on_generate_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_generation_failure_total",
            "provider" => provider.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_generation_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl SessionStoreHooks for MetricsObservabilityHooks {
    fn on_session_created(&self, _id: &SessionId, provider: ProviderId, _model: &str) {
        metrics::counter!("parley_session_created_total", "provider" => provider.to_string())
            .increment(1);
    }

    fn on_session_deleted(&self, _id: &SessionId) {
        metrics::counter!("parley_session_deleted_total").increment(1);
    }

    fn on_session_evicted(&self, _id: &SessionId, reason: EvictionReason) {
        metrics::counter!("parley_session_evicted_total", "reason" => reason.as_str())
            .increment(1);
    }
}
