//! OpenAI chat-completions adapter.

use std::sync::Arc;

use serde_json::Value;

use crate::adapters::{exchange, to_body};
use crate::{
    GenerationResult, HttpAuth, HttpRequest, ProviderAdapter, ProviderError, ProviderFuture,
    ProviderId, ProviderParams, ProviderTransport, SecretString, SecureCredentialManager, ToolCall,
};

use super::serde_api::{OpenAiChatMessage, OpenAiChatRequest, OpenAiChatResponse, OpenAiTool};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct OpenAiAdapter {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn ProviderTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Messages go out in caller order with system messages inline.
    pub fn translate(&self, params: &ProviderParams) -> OpenAiChatRequest {
        let tools = params.tools();

        OpenAiChatRequest {
            model: params.model.clone(),
            messages: params.messages.iter().map(OpenAiChatMessage::from).collect(),
            max_tokens: params.options.max_tokens,
            temperature: params.options.temperature,
            top_p: params.options.top_p,
            tools: (!tools.is_empty()).then(|| tools.iter().map(OpenAiTool::from).collect()),
        }
    }

    pub fn parse(&self, model: &str, response: OpenAiChatResponse, raw: Value) -> GenerationResult {
        let message = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message);

        let (text, tool_calls) = match message {
            Some(message) => (
                message.content.unwrap_or_default(),
                message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(ToolCall::from)
                    .collect(),
            ),
            None => (String::new(), Vec::new()),
        };

        GenerationResult {
            provider: ProviderId::OpenAi,
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
        request: &OpenAiChatRequest,
    ) -> Result<(OpenAiChatResponse, Value), ProviderError> {
        let body = to_body(ProviderId::OpenAi, request)?;
        let http = HttpRequest::post(format!("{}/chat/completions", self.base_url), body)
            .with_auth(HttpAuth::Bearer(api_key));

        exchange(self.transport.as_ref(), ProviderId::OpenAi, http).await
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn generate<'a>(
        &'a self,
        params: ProviderParams,
    ) -> ProviderFuture<'a, Result<GenerationResult, ProviderError>> {
        Box::pin(async move {
            let api_key = self.credentials.require_api_key(ProviderId::OpenAi)?;
            let request = self.translate(&params);
            let (response, raw) = self.invoke(api_key, &request).await?;
            Ok(self.parse(&params.model, response, raw))
        })
    }
}
