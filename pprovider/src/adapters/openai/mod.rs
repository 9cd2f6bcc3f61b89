mod provider;
mod serde_api;

pub use provider::{OPENAI_BASE_URL, OpenAiAdapter};
pub use serde_api::{
    OpenAiChatMessage, OpenAiChatRequest, OpenAiChatResponse, OpenAiChoice, OpenAiFunctionCall,
    OpenAiFunctionSpec, OpenAiResponseMessage, OpenAiTool, OpenAiToolCallPayload, OpenAiUsage,
};
