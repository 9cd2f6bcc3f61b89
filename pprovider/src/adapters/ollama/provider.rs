//! Ollama chat adapter for locally hosted models.

use std::sync::Arc;

use serde_json::Value;

use crate::adapters::openai::OpenAiTool;
use crate::adapters::{exchange, generated_call_id, to_body};
use crate::config::DEFAULT_OLLAMA_BASE_URL;
use crate::{
    GenerationResult, HttpRequest, Message, ProviderAdapter, ProviderError, ProviderFuture,
    ProviderId, ProviderParams, ProviderTransport, Role, TokenUsage, ToolCall,
};

use super::fallback::extract_fallback_tool_calls;
use super::serde_api::{
    OllamaChatMessage, OllamaChatRequest, OllamaChatResponse, OllamaFunction, OllamaOptions,
    OllamaToolCall,
};

#[derive(Clone)]
pub struct OllamaAdapter {
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
}

impl OllamaAdapter {
    pub fn new(transport: Arc<dyn ProviderTransport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn translate(&self, params: &ProviderParams) -> Result<OllamaChatRequest, ProviderError> {
        let messages = params
            .messages
            .iter()
            .map(to_ollama_message)
            .collect::<Result<Vec<_>, _>>()?;
        let tools = params.tools();

        Ok(OllamaChatRequest {
            model: params.model.clone(),
            stream: false,
            messages,
            options: OllamaOptions {
                temperature: params.options.temperature,
                num_predict: params.options.max_tokens,
                top_p: params.options.top_p,
            },
            tools: (!tools.is_empty()).then(|| tools.iter().map(OpenAiTool::from).collect()),
        })
    }

    /// Converts the response. When tools were requested but the model
    /// answered in plain text, tool calls are recovered from that text.
    pub fn parse(
        &self,
        model: &str,
        tools_requested: bool,
        response: OllamaChatResponse,
        raw: Value,
    ) -> GenerationResult {
        let (content, native_calls) = match response.message {
            Some(message) => (message.content, message.tool_calls.unwrap_or_default()),
            None => (None, Vec::new()),
        };
        let text = content.or(response.response).unwrap_or_default();

        let mut tool_calls = native_calls
            .into_iter()
            .map(|call| {
                ToolCall::from_value(
                    generated_call_id("call"),
                    call.function.name,
                    &call.function.arguments,
                )
            })
            .collect::<Vec<_>>();

        if tool_calls.is_empty() && tools_requested {
            tool_calls = extract_fallback_tool_calls(&text);
            if !tool_calls.is_empty() {
                tracing::debug!(
                    count = tool_calls.len(),
                    "recovered tool calls from ollama response text"
                );
            }
        }

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (None, None) => None,
            (input, output) => Some(TokenUsage::from_counts(
                input.unwrap_or(0),
                output.unwrap_or(0),
            )),
        };

        GenerationResult {
            provider: ProviderId::Ollama,
            model: model.to_string(),
            text,
            tool_calls,
            usage,
            raw_response: raw,
        }
    }

    async fn invoke(
        &self,
        request: &OllamaChatRequest,
    ) -> Result<(OllamaChatResponse, Value), ProviderError> {
        let body = to_body(ProviderId::Ollama, request)?;
        let http = HttpRequest::post(format!("{}/api/chat", self.base_url), body);

        exchange(self.transport.as_ref(), ProviderId::Ollama, http).await
    }
}

fn to_ollama_message(message: &Message) -> Result<OllamaChatMessage, ProviderError> {
    let content = match (message.role, &message.tool_call_id) {
        (Role::Tool, Some(call_id)) => format!("Tool result for {call_id}: {}", message.content),
        _ => message.content.clone(),
    };

    let tool_calls = match (message.role, &message.tool_calls) {
        (Role::Assistant, Some(calls)) => Some(
            calls
                .iter()
                .map(|call| {
                    Ok(OllamaToolCall {
                        function: OllamaFunction {
                            name: call.name.clone(),
                            arguments: call.arguments_value()?,
                        },
                    })
                })
                .collect::<Result<Vec<_>, ProviderError>>()?,
        ),
        _ => None,
    };

    Ok(OllamaChatMessage {
        role: message.role.as_str().to_string(),
        content,
        tool_calls,
    })
}

impl ProviderAdapter for OllamaAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn generate<'a>(
        &'a self,
        params: ProviderParams,
    ) -> ProviderFuture<'a, Result<GenerationResult, ProviderError>> {
        Box::pin(async move {
            let request = self.translate(&params)?;
            let (response, raw) = self.invoke(&request).await?;
            Ok(self.parse(&params.model, !params.tools().is_empty(), response, raw))
        })
    }
}
