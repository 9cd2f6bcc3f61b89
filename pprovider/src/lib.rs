//! Provider-agnostic text generation over OpenAI, Anthropic, Google, and Ollama.
//!
//! Callers build a [`GenerationRequest`], hand it to a
//! [`GenerationDispatcher`], and get back a [`GenerationResult`] whose shape
//! does not depend on the provider that produced it.
//!
//! ```rust
//! use pprovider::{GenerationRequest, Message, ProviderId, Role};
//!
//! let request = GenerationRequest::new(
//!     ProviderId::OpenAi,
//!     "gpt-4o-mini",
//!     vec![Message::new(Role::User, "hello")],
//! )
//! .with_temperature(0.2);
//!
//! assert_eq!(request.options.temperature, Some(0.2));
//! ```

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod hooks;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod transport;

pub use catalog::{
    DEFAULT_MODEL_ID, ProviderAvailability, ResolvedModel, default_model, resolve_model_id,
    suggested_models,
};
pub use config::{DEFAULT_OLLAMA_BASE_URL, OLLAMA_BASE_URL_VAR, ProviderConfig};
pub use credentials::{SecretString, SecureCredentialManager};
pub use dispatcher::{GenerationDispatcher, GenerationDispatcherBuilder};
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{GenerationHooks, NoopGenerationHooks};
pub use model::{
    GenerationRequest, GenerationResult, Message, ProviderId, Role, TokenUsage, ToolCall,
    ToolDefinition, canonical_arguments, split_system_prompt, validate_messages,
};
pub use pcommon::GenerationOptions;
pub use provider::{ProviderAdapter, ProviderFuture, ProviderParams};
pub use transport::{HttpAuth, HttpRequest, HttpResponse, ProviderTransport, ReqwestTransport};
