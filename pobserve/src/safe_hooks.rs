use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pcommon::SessionId;
use pprovider::{GenerationHooks, GenerationResult, ProviderError, ProviderId};
use psession::{EvictionReason, SessionStoreHooks};

/// Swallows panics raised by the wrapped generation hooks.
pub struct SafeGenerationHooks<H> {
    inner: H,
}

impl<H> SafeGenerationHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> GenerationHooks for SafeGenerationHooks<H>
where
    H: GenerationHooks,
{
    fn on_generate_start(&self, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_generate_start(provider, model)
        }));
    }

    fn on_generate_success(
        &self,
        provider: ProviderId,
        model: &str,
        result: &GenerationResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_generate_success(provider, model, result, elapsed)
        }));
    }

    fn on_generate_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_generate_failure(provider, model, error, elapsed)
        }));
    }
}

pub struct SafeSessionStoreHooks<H> {
    inner: H,
}

impl<H> SafeSessionStoreHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> SessionStoreHooks for SafeSessionStoreHooks<H>
where
    H: SessionStoreHooks,
{
    fn on_session_created(&self, id: &SessionId, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_created(id, provider, model)
        }));
    }

    fn on_session_deleted(&self, id: &SessionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_session_deleted(id)));
    }

    fn on_session_evicted(&self, id: &SessionId, reason: EvictionReason) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_evicted(id, reason)
        }));
    }
}
