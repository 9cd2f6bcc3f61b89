//! Provider-agnostic request, result, and message model types.
//!
//! ```rust
//! use pprovider::{GenerationRequest, Message, ProviderId, split_system_prompt};
//!
//! let request = GenerationRequest::new(
//!     ProviderId::Anthropic,
//!     "claude-3-5-haiku-latest",
//!     vec![
//!         Message::system("Be terse."),
//!         Message::user("Summarize this diff"),
//!     ],
//! )
//! .with_max_tokens(256);
//!
//! let (system_prompt, conversation) = split_system_prompt(&request.messages);
//! assert_eq!(system_prompt.as_deref(), Some("Be terse."));
//! assert_eq!(conversation.len(), 1);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pcommon::GenerationOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
    Ollama,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Google,
        ProviderId::Ollama,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Ollama => "ollama",
        }
    }

    /// Human-facing provider name used in upstream error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Google => "Google",
            Self::Ollama => "Ollama",
        }
    }

    /// Environment variable holding this provider's API key, if it needs one.
    pub fn credential_env_var(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Google => Some("GEMINI_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == value)
            .ok_or_else(|| ProviderError::validation(format!("Unsupported provider: {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "tool" => Ok(Self::Tool),
            other => Err(ProviderError::validation(format!(
                "Unsupported message role: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Assistant turn carrying tool calls; an empty list is stored as no tool calls.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A function invocation requested by the model.
///
/// `arguments` is always a JSON-encoded string so callers can forward it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Builds a call from a structured argument value as returned by providers
    /// that do not encode arguments as strings.
    pub fn from_value(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        Self::new(id, name, canonical_arguments(arguments))
    }

    /// Parses `arguments` for providers that expect a structured object.
    ///
    /// Blank arguments are treated as an empty object.
    pub fn arguments_value(&self) -> Result<Value, ProviderError> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&self.arguments).map_err(|err| {
            ProviderError::validation(format!(
                "Tool call '{}' has invalid JSON arguments: {err}",
                self.name
            ))
        })
    }
}

/// Canonical argument string for a structured value: strings pass through,
/// null becomes `{}`, anything else is JSON-encoded.
pub fn canonical_arguments(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.clone(),
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32, total_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }

    /// Builds usage from input and output counts. The total saturates at
    /// `u32::MAX`.
    pub fn from_counts(input_tokens: u32, output_tokens: u32) -> Self {
        Self::new(
            input_tokens,
            output_tokens,
            input_tokens.saturating_add(output_tokens),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub provider: ProviderId,
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub options: GenerationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl GenerationRequest {
    pub fn new(provider: ProviderId, model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            provider,
            model: model.into(),
            messages,
            options: GenerationOptions::default(),
            tools: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.options.top_p = Some(top_p);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub provider: ProviderId,
    pub model: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw_response: Value,
}

impl GenerationResult {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Assistant message that records this result in a conversation history.
    pub fn to_assistant_message(&self) -> Message {
        Message::assistant_with_tool_calls(self.text.clone(), self.tool_calls.clone())
    }
}

/// Checks message shape without looking at roles beyond what the type already guarantees.
pub fn validate_messages(messages: &[Message]) -> Result<(), ProviderError> {
    if messages.is_empty() {
        return Err(ProviderError::validation("At least one message is required"));
    }

    for message in messages {
        if message.tool_calls.is_none() && message.content.trim().is_empty() {
            return Err(ProviderError::validation(
                "Message content must be a non-empty string",
            ));
        }
    }

    Ok(())
}

/// Separates system messages from the conversation.
///
/// System contents are trimmed, blanks dropped, and the rest joined with a
/// blank line. Conversation order is preserved.
pub fn split_system_prompt(messages: &[Message]) -> (Option<String>, Vec<Message>) {
    let mut system_parts = Vec::new();
    let mut conversation = Vec::with_capacity(messages.len());

    for message in messages {
        if message.role == Role::System {
            let trimmed = message.content.trim();
            if !trimmed.is_empty() {
                system_parts.push(trimmed);
            }
        } else {
            conversation.push(message.clone());
        }
    }

    let system_prompt = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
    (system_prompt, conversation)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn provider_id_display_and_parse_are_stable() {
        for provider in ProviderId::ALL {
            let parsed: ProviderId = provider.to_string().parse().expect("round trip");
            assert_eq!(parsed, provider);
        }

        let err = "mistral".parse::<ProviderId>().expect_err("unknown provider");
        assert_eq!(err.kind, ProviderErrorKind::Validation);
        assert_eq!(err.message, "Unsupported provider: mistral");
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let err = "narrator".parse::<Role>().expect_err("unknown role");
        assert_eq!(err.kind, ProviderErrorKind::Validation);
        assert_eq!(err.message, "Unsupported message role: narrator");

        let decoded = serde_json::from_value::<Message>(json!({"role": "narrator", "content": "x"}));
        assert!(decoded.is_err());
    }

    #[test]
    fn validate_messages_enforces_content_rules() {
        let err = validate_messages(&[]).expect_err("empty list must fail");
        assert_eq!(err.message, "At least one message is required");

        let err = validate_messages(&[Message::user("   ")]).expect_err("blank content must fail");
        assert_eq!(err.message, "Message content must be a non-empty string");

        let tool_turn = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("call_1", "lookup", "{}")],
        );
        assert!(validate_messages(&[Message::user("hi"), tool_turn]).is_ok());
    }

    #[test]
    fn split_system_prompt_is_lossless_and_ordered() {
        let messages = vec![
            Message::system("  first rule "),
            Message::user("one"),
            Message::system("   "),
            Message::assistant("two"),
            Message::system("second rule"),
            Message::tool_result("call_1", "three"),
        ];

        let (system_prompt, conversation) = split_system_prompt(&messages);

        assert_eq!(system_prompt.as_deref(), Some("first rule\n\nsecond rule"));
        let contents = conversation
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(
            conversation.len() + messages.iter().filter(|m| m.role == Role::System).count(),
            messages.len()
        );
    }

    #[test]
    fn split_system_prompt_omits_empty_prompt() {
        let (system_prompt, conversation) = split_system_prompt(&[Message::user("hi")]);
        assert_eq!(system_prompt, None);
        assert_eq!(conversation, vec![Message::user("hi")]);
    }

    #[test]
    fn tool_call_arguments_parse_and_canonicalize() {
        let call = ToolCall::new("call_1", "openCanvas", "{\"path\":\"/tmp\"}");
        assert_eq!(call.arguments_value().expect("valid json"), json!({"path": "/tmp"}));

        let blank = ToolCall::new("call_2", "noop", " ");
        assert_eq!(blank.arguments_value().expect("blank is empty object"), json!({}));

        let broken = ToolCall::new("call_3", "broken", "{not json");
        let err = broken.arguments_value().expect_err("invalid json must fail");
        assert_eq!(err.kind, ProviderErrorKind::Validation);

        assert_eq!(canonical_arguments(&json!(null)), "{}");
        assert_eq!(canonical_arguments(&json!("{\"a\":1}")), "{\"a\":1}");
        assert_eq!(canonical_arguments(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn request_serializes_with_flattened_camel_case_options() {
        let request = GenerationRequest::new(ProviderId::Google, "gemini-2.5-flash", vec![Message::user("hi")])
            .with_max_tokens(64)
            .with_top_p(0.5);

        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value["provider"], json!("google"));
        assert_eq!(value["maxTokens"], json!(64));
        assert_eq!(value["topP"], json!(0.5));
        assert!(value.get("temperature").is_none());
        assert!(value.get("tools").is_none());
    }
}
