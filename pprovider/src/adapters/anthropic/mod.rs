mod provider;
mod serde_api;
mod tests;

pub use provider::{ANTHROPIC_BASE_URL, ANTHROPIC_VERSION, AnthropicAdapter, DEFAULT_MAX_TOKENS};
pub use serde_api::{
    AnthropicContentBlock, AnthropicMessage, AnthropicMessagesRequest, AnthropicMessagesResponse,
    AnthropicResponseBlock, AnthropicTool, AnthropicUsage,
};
