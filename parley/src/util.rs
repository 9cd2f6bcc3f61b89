//! Small convenience constructors for common types.

use crate::{CreateSession, Message, ProviderId, Role, ToolOutput};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

pub fn tool_message(call_id: impl Into<String>, content: impl Into<String>) -> Message {
    Message::tool_result(call_id, content)
}

pub fn tool_output(call_id: impl Into<String>, output: impl Into<String>) -> ToolOutput {
    ToolOutput::new(call_id, output)
}

pub fn session(provider: ProviderId, model: impl Into<String>) -> CreateSession {
    CreateSession::new(provider, model)
}

/// Lenient provider lookup that also accepts common aliases.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openai" | "gpt" => Some(ProviderId::OpenAi),
        "anthropic" | "claude" => Some(ProviderId::Anthropic),
        "google" | "gemini" => Some(ProviderId::Google),
        "ollama" | "local" => Some(ProviderId::Ollama),
        _ => None,
    }
}
