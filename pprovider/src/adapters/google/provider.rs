//! Google Gemini `generateContent` adapter.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::adapters::{exchange, generated_call_id, to_body};
use crate::{
    GenerationResult, HttpAuth, HttpRequest, Message, ProviderAdapter, ProviderError,
    ProviderFuture, ProviderId, ProviderParams, ProviderTransport, Role, SecretString,
    SecureCredentialManager, ToolCall,
};

use super::serde_api::{
    GeminiContent, GeminiFunctionCallingConfig, GeminiFunctionDeclaration, GeminiGenerateRequest,
    GeminiGenerateResponse, GeminiGenerationConfig, GeminiPart, GeminiSystemInstruction,
    GeminiTool, GeminiToolConfig,
};

pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Prefixes bare model ids with `models/`.
pub fn normalize_model_id(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Clone)]
pub struct GoogleAdapter {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn ProviderTransport>,
    base_url: String,
}

impl GoogleAdapter {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn ProviderTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the wire request. Declaring tools forces function calling
    /// (`mode: ANY`) restricted to the declared names.
    pub fn translate(&self, params: &ProviderParams) -> Result<GeminiGenerateRequest, ProviderError> {
        let contents = to_gemini_contents(&params.conversation)?;
        let options = params.options;
        let generation_config = (!options.is_empty()).then_some(GeminiGenerationConfig {
            max_output_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
        });

        let tools = params.tools();
        let (gemini_tools, tool_config) = if tools.is_empty() {
            (None, None)
        } else {
            (
                Some(vec![GeminiTool {
                    function_declarations: tools
                        .iter()
                        .map(GeminiFunctionDeclaration::from)
                        .collect(),
                }]),
                Some(GeminiToolConfig {
                    function_calling_config: GeminiFunctionCallingConfig {
                        mode: "ANY",
                        allowed_function_names: tools.iter().map(|tool| tool.name.clone()).collect(),
                    },
                }),
            )
        };

        Ok(GeminiGenerateRequest {
            model: normalize_model_id(&params.model),
            contents,
            system_instruction: params.system_prompt.as_ref().map(|prompt| {
                GeminiSystemInstruction {
                    parts: vec![GeminiPart::text(prompt.clone())],
                }
            }),
            generation_config,
            tools: gemini_tools,
            tool_config,
        })
    }

    pub fn parse(&self, model: &str, response: GeminiGenerateResponse, raw: Value) -> GenerationResult {
        let parts = response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .collect::<Vec<_>>();

        let text = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string();

        let tool_calls = parts
            .into_iter()
            .filter_map(|part| part.function_call)
            .map(|call| ToolCall::from_value(generated_call_id("call"), call.name, &call.args))
            .collect();

        GenerationResult {
            provider: ProviderId::Google,
            model: model.to_string(),
            text,
            tool_calls,
            usage: response.usage_metadata.map(Into::into),
            raw_response: raw,
        }
    }

    async fn invoke(
        &self,
        api_key: SecretString,
        request: &GeminiGenerateRequest,
    ) -> Result<(GeminiGenerateResponse, Value), ProviderError> {
        let body = to_body(ProviderId::Google, request)?;
        let url = format!("{}/{}:generateContent", self.base_url, request.model);
        let http = HttpRequest::post(url, body).with_auth(HttpAuth::Header {
            name: "x-goog-api-key",
            value: api_key,
        });

        exchange(self.transport.as_ref(), ProviderId::Google, http).await
    }
}

/// Maps the conversation onto Gemini contents.
///
/// Gemini answers a function call by function name, not call id, so names
/// are looked up from earlier assistant tool calls. Unknown ids fall back to
/// the id itself.
fn to_gemini_contents(conversation: &[Message]) -> Result<Vec<GeminiContent>, ProviderError> {
    let mut call_names: HashMap<&str, &str> = HashMap::new();
    let mut contents = Vec::with_capacity(conversation.len());

    for message in conversation {
        let role = if message.role == Role::Assistant {
            "model"
        } else {
            "user"
        };
        let mut parts = Vec::new();

        match (message.role, &message.tool_call_id, &message.tool_calls) {
            (Role::Tool, Some(call_id), _) => {
                let name = match call_names.get(call_id.as_str()) {
                    Some(name) => *name,
                    None => {
                        tracing::warn!(
                            call_id = %call_id,
                            "no prior tool call found for tool result; using the call id as function name"
                        );
                        call_id.as_str()
                    }
                };
                parts.push(GeminiPart::function_response(
                    name,
                    json!({ "result": message.content }),
                ));
            }
            (Role::Assistant, _, Some(calls)) => {
                if !message.content.is_empty() {
                    parts.push(GeminiPart::text(message.content.clone()));
                }
                for call in calls {
                    call_names.insert(call.id.as_str(), call.name.as_str());
                    parts.push(GeminiPart::function_call(
                        call.name.clone(),
                        call.arguments_value()?,
                    ));
                }
            }
            _ => parts.push(GeminiPart::text(message.content.clone())),
        }

        contents.push(GeminiContent {
            role: role.to_string(),
            parts,
        });
    }

    Ok(contents)
}

impl ProviderAdapter for GoogleAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn generate<'a>(
        &'a self,
        params: ProviderParams,
    ) -> ProviderFuture<'a, Result<GenerationResult, ProviderError>> {
        Box::pin(async move {
            let api_key = self.credentials.require_api_key(ProviderId::Google)?;
            let request = self.translate(&params)?;
            let (response, raw) = self.invoke(api_key, &request).await?;
            Ok(self.parse(&params.model, response, raw))
        })
    }
}
