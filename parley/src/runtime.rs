//! Runtime wiring: builds a [`TextService`] from environment configuration.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use parley::{ParleyConfig, build_service};
//!
//! let config = ParleyConfig::from_vars([("OLLAMA_BASE_URL", "http://gpu-box:11434")])
//!     .with_http_timeout(Duration::from_secs(60));
//! let service = build_service(config).expect("service should build");
//!
//! assert!(service.describe_providers().iter().any(|entry| entry.has_credentials));
//! ```

use std::sync::Arc;
use std::time::Duration;

use pcommon::{Clock, SystemClock};
use pobserve::{SafeGenerationHooks, SafeSessionStoreHooks, TracingObservabilityHooks};
use pprovider::{
    GenerationDispatcher, GenerationHooks, ProviderConfig, ProviderError, ProviderTransport,
    ReqwestTransport,
};
use psession::{SessionStore, SessionStoreConfig, SessionStoreHooks};

use crate::{ServiceError, TextService};

#[derive(Clone)]
pub struct ParleyConfig {
    pub provider: ProviderConfig,
    /// Whole-request timeout for provider calls. Unset means no timeout.
    pub http_timeout: Option<Duration>,
    pub sessions: SessionStoreConfig,
    pub clock: Arc<dyn Clock>,
    pub generation_hooks: Arc<dyn GenerationHooks>,
    pub session_hooks: Arc<dyn SessionStoreHooks>,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self::with_provider(ProviderConfig::default())
    }
}

impl ParleyConfig {
    fn with_provider(provider: ProviderConfig) -> Self {
        Self {
            provider,
            http_timeout: None,
            sessions: SessionStoreConfig::default(),
            clock: Arc::new(SystemClock),
            generation_hooks: Arc::new(SafeGenerationHooks::new(TracingObservabilityHooks)),
            session_hooks: Arc::new(SafeSessionStoreHooks::new(TracingObservabilityHooks)),
        }
    }

    pub fn from_env() -> Self {
        Self::with_provider(ProviderConfig::from_env())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::with_provider(ProviderConfig::from_vars(vars))
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStoreConfig) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_generation_hooks(mut self, hooks: Arc<dyn GenerationHooks>) -> Self {
        self.generation_hooks = hooks;
        self
    }

    pub fn with_session_hooks(mut self, hooks: Arc<dyn SessionStoreHooks>) -> Self {
        self.session_hooks = hooks;
        self
    }
}

impl std::fmt::Debug for ParleyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyConfig")
            .field("provider", &self.provider)
            .field("http_timeout", &self.http_timeout)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

/// Builds a service over a reqwest client.
pub fn build_service(config: ParleyConfig) -> Result<TextService, ServiceError> {
    let mut client = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        client = client.timeout(timeout);
    }
    let client = client.build().map_err(|err| {
        ProviderError::configuration(format!("failed to build HTTP client: {err}"))
    })?;

    Ok(build_service_with_transport(
        config,
        Arc::new(ReqwestTransport::new(client)),
    ))
}

/// Reads `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY` and
/// `OLLAMA_BASE_URL` from the process environment.
pub fn build_service_from_env() -> Result<TextService, ServiceError> {
    build_service(ParleyConfig::from_env())
}

/// Builds a service over an explicit transport. `http_timeout` is ignored.
pub fn build_service_with_transport(
    config: ParleyConfig,
    transport: Arc<dyn ProviderTransport>,
) -> TextService {
    let dispatcher = GenerationDispatcher::builder(transport)
        .config(config.provider)
        .hooks(config.generation_hooks)
        .build();
    let sessions = SessionStore::new(config.sessions)
        .with_clock(config.clock)
        .with_hooks(config.session_hooks);

    TextService::new(dispatcher, sessions)
}

#[cfg(test)]
mod tests {
    use pprovider::ProviderId;

    use super::*;

    #[test]
    fn default_config_has_no_timeout_and_documented_store_limits() {
        let config = ParleyConfig::default();
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.sessions, SessionStoreConfig::default());
        assert_eq!(
            config.provider.ollama_base_url(),
            pprovider::DEFAULT_OLLAMA_BASE_URL
        );
    }

    #[test]
    fn from_vars_feeds_credentials_into_the_dispatcher() {
        let service = build_service(ParleyConfig::from_vars([
            ("ANTHROPIC_API_KEY", "sk-ant-test"),
            ("OPENAI_API_KEY", ""),
        ]))
        .expect("service should build");

        let availability = service
            .describe_providers()
            .into_iter()
            .map(|entry| (entry.provider, entry.has_credentials))
            .collect::<Vec<_>>();
        assert_eq!(
            availability,
            vec![
                (ProviderId::OpenAi, false),
                (ProviderId::Anthropic, true),
                (ProviderId::Google, false),
                (ProviderId::Ollama, true),
            ]
        );
    }
}
