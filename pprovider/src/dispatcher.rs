//! Validation and routing of generation requests to provider adapters.
//!
//! ```rust,no_run
//! use pprovider::{GenerationDispatcher, GenerationRequest, Message, ProviderId};
//!
//! # async fn run() -> Result<(), pprovider::ProviderError> {
//! let dispatcher = GenerationDispatcher::from_env(reqwest::Client::new());
//! let result = dispatcher
//!     .generate(GenerationRequest::new(
//!         ProviderId::Ollama,
//!         "gpt-oss:20b",
//!         vec![Message::user("Say hi")],
//!     ))
//!     .await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::adapters::anthropic::AnthropicAdapter;
use crate::adapters::google::GoogleAdapter;
use crate::adapters::ollama::OllamaAdapter;
use crate::adapters::openai::OpenAiAdapter;
use crate::catalog::ProviderAvailability;
use crate::{
    GenerationHooks, GenerationRequest, GenerationResult, NoopGenerationHooks, ProviderAdapter,
    ProviderConfig, ProviderError, ProviderId, ProviderParams, ProviderTransport, ReqwestTransport,
    SecureCredentialManager, split_system_prompt, validate_messages,
};

pub struct GenerationDispatcher {
    openai: OpenAiAdapter,
    anthropic: AnthropicAdapter,
    google: GoogleAdapter,
    ollama: OllamaAdapter,
    credentials: Arc<SecureCredentialManager>,
    hooks: Arc<dyn GenerationHooks>,
}

impl GenerationDispatcher {
    pub fn builder(transport: Arc<dyn ProviderTransport>) -> GenerationDispatcherBuilder {
        GenerationDispatcherBuilder::new(transport)
    }

    /// Dispatcher over a reqwest client with credentials read from the environment.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::builder(Arc::new(ReqwestTransport::new(client)))
            .config(ProviderConfig::from_env())
            .build()
    }

    pub fn credentials(&self) -> &Arc<SecureCredentialManager> {
        &self.credentials
    }

    /// Validates, routes to the adapter for `request.provider`, and returns
    /// its result unchanged.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, ProviderError> {
        let provider = request.provider;
        let model = request.model.trim().to_string();
        let started = Instant::now();
        self.hooks.on_generate_start(provider, &model);

        let outcome = match self.prepare(request) {
            Ok(params) => self.adapter(provider).generate(params).await,
            Err(error) => Err(error),
        };

        let elapsed = started.elapsed();
        match &outcome {
            Ok(result) => self
                .hooks
                .on_generate_success(provider, &model, result, elapsed),
            Err(error) => self
                .hooks
                .on_generate_failure(provider, &model, error, elapsed),
        }

        outcome
    }

    /// Reports credential presence and catalog models for every provider.
    pub fn describe_providers(&self) -> Vec<ProviderAvailability> {
        ProviderId::ALL
            .into_iter()
            .map(|provider| {
                let has_credentials = match self.credentials.has_credentials(provider) {
                    Ok(present) => present,
                    Err(error) => {
                        tracing::warn!(
                            provider = %provider,
                            error = %error,
                            "credential lookup failed; reporting provider as unconfigured"
                        );
                        false
                    }
                };
                ProviderAvailability::from_catalog(provider, has_credentials)
            })
            .collect()
    }

    fn prepare(&self, request: GenerationRequest) -> Result<ProviderParams, ProviderError> {
        let model = request.model.trim();
        if model.is_empty() {
            return Err(ProviderError::validation("Model is required"));
        }

        validate_messages(&request.messages)?;
        let (system_prompt, conversation) = split_system_prompt(&request.messages);
        if conversation.is_empty() {
            return Err(ProviderError::validation(
                "At least one non-system message is required",
            ));
        }

        Ok(ProviderParams {
            model: model.to_string(),
            messages: request.messages,
            conversation,
            system_prompt,
            options: request.options,
            tools: request.tools,
        })
    }

    fn adapter(&self, provider: ProviderId) -> &dyn ProviderAdapter {
        match provider {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Google => &self.google,
            ProviderId::Ollama => &self.ollama,
        }
    }
}

impl std::fmt::Debug for GenerationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationDispatcher")
            .field("credentials", &self.credentials)
            .field("ollama_base_url", &self.ollama.base_url())
            .finish_non_exhaustive()
    }
}

pub struct GenerationDispatcherBuilder {
    transport: Arc<dyn ProviderTransport>,
    config: ProviderConfig,
    hooks: Arc<dyn GenerationHooks>,
    openai_base_url: Option<String>,
    anthropic_base_url: Option<String>,
    google_base_url: Option<String>,
}

impl GenerationDispatcherBuilder {
    pub fn new(transport: Arc<dyn ProviderTransport>) -> Self {
        Self {
            transport,
            config: ProviderConfig::default(),
            hooks: Arc::new(NoopGenerationHooks),
            openai_base_url: None,
            anthropic_base_url: None,
            google_base_url: None,
        }
    }

    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(mut self, credentials: Arc<SecureCredentialManager>) -> Self {
        self.config = self.config.with_credentials(credentials);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn GenerationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn ollama_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_ollama_base_url(base_url);
        self
    }

    pub fn openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = Some(base_url.into());
        self
    }

    pub fn anthropic_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.anthropic_base_url = Some(base_url.into());
        self
    }

    pub fn google_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.google_base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> GenerationDispatcher {
        let credentials = Arc::clone(self.config.credentials());
        let transport = self.transport;

        let mut openai = OpenAiAdapter::new(Arc::clone(&credentials), Arc::clone(&transport));
        if let Some(url) = self.openai_base_url {
            openai = openai.with_base_url(url);
        }
        let mut anthropic = AnthropicAdapter::new(Arc::clone(&credentials), Arc::clone(&transport));
        if let Some(url) = self.anthropic_base_url {
            anthropic = anthropic.with_base_url(url);
        }
        let mut google = GoogleAdapter::new(Arc::clone(&credentials), Arc::clone(&transport));
        if let Some(url) = self.google_base_url {
            google = google.with_base_url(url);
        }
        let ollama = OllamaAdapter::new(transport).with_base_url(self.config.ollama_base_url());

        GenerationDispatcher {
            openai,
            anthropic,
            google,
            ollama,
            credentials,
            hooks: self.hooks,
        }
    }
}
