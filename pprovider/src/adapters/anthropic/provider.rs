//! Anthropic messages API adapter.

use std::sync::Arc;

use serde_json::Value;

use crate::adapters::{exchange, to_body};
use crate::{
    GenerationResult, HttpAuth, HttpRequest, Message, ProviderAdapter, ProviderError,
    ProviderFuture, ProviderId, ProviderParams, ProviderTransport, Role, SecretString,
    SecureCredentialManager, ToolCall,
};

use super::serde_api::{
    AnthropicContentBlock, AnthropicMessage, AnthropicMessagesRequest, AnthropicMessagesResponse,
    AnthropicResponseBlock, AnthropicTool,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Anthropic requires `max_tokens`; this applies when the caller left it unset.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Clone)]
pub struct AnthropicAdapter {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
}

impl AnthropicAdapter {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn ProviderTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the wire request from the conversation only; system text moves
    /// to the top-level `system` field.
    pub fn translate(
        &self,
        params: &ProviderParams,
    ) -> Result<AnthropicMessagesRequest, ProviderError> {
        let messages = params
            .conversation
            .iter()
            .map(to_anthropic_message)
            .collect::<Result<Vec<_>, _>>()?;
        let tools = params.tools();

        Ok(AnthropicMessagesRequest {
            model: params.model.clone(),
            max_tokens: params.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages,
            system: params.system_prompt.clone(),
            temperature: params.options.temperature,
            top_p: params.options.top_p,
            tools: (!tools.is_empty()).then(|| tools.iter().map(AnthropicTool::from).collect()),
        })
    }

    pub fn parse(
        &self,
        model: &str,
        response: AnthropicMessagesResponse,
        raw: Value,
    ) -> GenerationResult {
        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for block in response.content {
            match block {
                AnthropicResponseBlock::Text { text: part } => text.push_str(&part),
                AnthropicResponseBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::from_value(id, name, &input));
                }
                AnthropicResponseBlock::Other => {}
            }
        }

        GenerationResult {
            provider: ProviderId::Anthropic,
            model: model.to_string(),
            text,
            tool_calls,
            usage: response.usage.map(Into::into),
            raw_response: raw,
        }
    }

    async fn invoke(
        &self,
        api_key: SecretString,
        request: &AnthropicMessagesRequest,
    ) -> Result<(AnthropicMessagesResponse, Value), ProviderError> {
        let body = to_body(ProviderId::Anthropic, request)?;
        let http = HttpRequest::post(format!("{}/messages", self.base_url), body)
            .with_auth(HttpAuth::Header {
                name: "x-api-key",
                value: api_key,
            })
            .with_header("anthropic-version", ANTHROPIC_VERSION);

        exchange(self.transport.as_ref(), ProviderId::Anthropic, http).await
    }
}

fn to_anthropic_message(message: &Message) -> Result<AnthropicMessage, ProviderError> {
    if message.role == Role::Tool
        && let Some(tool_use_id) = &message.tool_call_id
    {
        return Ok(AnthropicMessage {
            role: "user",
            content: vec![AnthropicContentBlock::ToolResult {
                tool_use_id: tool_use_id.clone(),
                content: message.content.clone(),
            }],
        });
    }

    if message.role == Role::Assistant
        && let Some(calls) = &message.tool_calls
    {
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !message.content.is_empty() {
            content.push(AnthropicContentBlock::Text {
                text: message.content.clone(),
            });
        }
        for call in calls {
            content.push(AnthropicContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.arguments_value()?,
            });
        }

        return Ok(AnthropicMessage {
            role: "assistant",
            content,
        });
    }

    Ok(AnthropicMessage {
        role: if message.role == Role::Assistant {
            "assistant"
        } else {
            "user"
        },
        content: vec![AnthropicContentBlock::Text {
            text: message.content.clone(),
        }],
    })
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn generate<'a>(
        &'a self,
        params: ProviderParams,
    ) -> ProviderFuture<'a, Result<GenerationResult, ProviderError>> {
        Box::pin(async move {
            let api_key = self.credentials.require_api_key(ProviderId::Anthropic)?;
            let request = self.translate(&params)?;
            let (response, raw) = self.invoke(api_key, &request).await?;
            Ok(self.parse(&params.model, response, raw))
        })
    }
}
