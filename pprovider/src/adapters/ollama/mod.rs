mod fallback;
mod provider;
mod serde_api;

pub use fallback::{extract_fallback_tool_calls, strip_code_fence};
pub use provider::OllamaAdapter;
pub use serde_api::{
    OllamaChatMessage, OllamaChatRequest, OllamaChatResponse, OllamaFunction, OllamaOptions,
    OllamaResponseMessage, OllamaToolCall,
};
