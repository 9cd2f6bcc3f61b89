//! Generation lifecycle hook contract.
//!
//! The dispatcher reports every call through a [`GenerationHooks`]
//! implementation. Nothing here retries; hooks only observe.

use std::time::Duration;

use crate::{GenerationResult, ProviderError, ProviderId};

pub trait GenerationHooks: Send + Sync {
    fn on_generate_start(&self, _provider: ProviderId, _model: &str) {}

    fn on_generate_success(
        &self,
        _provider: ProviderId,
        _model: &str,
        _result: &GenerationResult,
        _elapsed: Duration,
    ) {
    }

    fn on_generate_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGenerationHooks;

impl GenerationHooks for NoopGenerationHooks {}
