#![cfg(test)]

use std::sync::Arc;

use pcommon::GenerationOptions;
use serde_json::json;

use crate::adapters::test_support::{RecordingTransport, credentials_with, params};
use crate::{
    HttpAuth, Message, ProviderAdapter, ProviderErrorKind, ProviderId, SecretString, TokenUsage,
    ToolCall, ToolDefinition,
};

use super::provider::{GoogleAdapter, normalize_model_id};

fn adapter(transport: Arc<RecordingTransport>) -> GoogleAdapter {
    GoogleAdapter::new(credentials_with(&[(ProviderId::Google, "AIza-test")]), transport)
}

#[test]
fn model_ids_gain_the_models_prefix_once() {
    assert_eq!(normalize_model_id("gemini-2.5-flash"), "models/gemini-2.5-flash");
    assert_eq!(normalize_model_id("models/gemini-2.5-pro"), "models/gemini-2.5-pro");
}

#[test]
fn translate_maps_roles_system_instruction_and_generation_config() {
    let adapter = adapter(RecordingTransport::replying(200, json!({})));
    let request = adapter
        .translate(&params(
            "gemini-2.5-flash",
            vec![
                Message::system("Answer in French."),
                Message::user("hello"),
                Message::assistant("bonjour"),
            ],
            GenerationOptions::default().with_max_tokens(128).with_top_p(0.5),
            None,
        ))
        .expect("translate should succeed");

    assert_eq!(request.model, "models/gemini-2.5-flash");
    let body = serde_json::to_value(&request).expect("request should encode");
    assert_eq!(
        body,
        json!({
            "contents": [
                {"role": "user", "parts": [{"text": "hello"}]},
                {"role": "model", "parts": [{"text": "bonjour"}]}
            ],
            "systemInstruction": {"parts": [{"text": "Answer in French."}]},
            "generationConfig": {"maxOutputTokens": 128, "topP": 0.5}
        })
    );
}

#[test]
fn tool_results_are_answered_by_function_name() {
    let adapter = adapter(RecordingTransport::replying(200, json!({})));
    let request = adapter
        .translate(&params(
            "gemini-2.5-flash",
            vec![
                Message::user("weather?"),
                Message::assistant_with_tool_calls(
                    "",
                    vec![ToolCall::new("call_abc", "get_weather", "{\"city\":\"Lima\"}")],
                ),
                Message::tool_result("call_abc", "sunny"),
                Message::tool_result("call_unknown", "orphan"),
            ],
            GenerationOptions::default(),
            None,
        ))
        .expect("translate should succeed");

    let body = serde_json::to_value(&request.contents).expect("contents should encode");
    assert_eq!(
        body,
        json!([
            {"role": "user", "parts": [{"text": "weather?"}]},
            {"role": "model", "parts": [{"functionCall": {"name": "get_weather", "args": {"city": "Lima"}}}]},
            {"role": "user", "parts": [{"functionResponse": {"name": "get_weather", "response": {"result": "sunny"}}}]},
            {"role": "user", "parts": [{"functionResponse": {"name": "call_unknown", "response": {"result": "orphan"}}}]}
        ])
    );
}

#[tokio::test]
async fn declared_tools_force_function_calling_and_surface_the_call() {
    let transport = RecordingTransport::replying(
        200,
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "openCanvas", "args": {}}}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 5, "totalTokenCount": 25}
        }),
    );
    let adapter = adapter(transport.clone());
    let tool = ToolDefinition::new("openCanvas")
        .with_description("Open the drawing canvas")
        .with_parameters(json!({"type": "object", "properties": {}}));

    let result = adapter
        .generate(params(
            "gemini-2.5-flash",
            vec![Message::user("please open the canvas")],
            GenerationOptions::default(),
            Some(vec![tool]),
        ))
        .await
        .expect("generation should succeed");

    assert_eq!(result.provider, ProviderId::Google);
    assert_eq!(result.model, "gemini-2.5-flash");
    assert_eq!(result.text, "");
    assert_eq!(result.tool_calls.len(), 1);
    assert_eq!(result.tool_calls[0].name, "openCanvas");
    assert_eq!(result.tool_calls[0].arguments, "{}");
    assert!(result.tool_calls[0].id.starts_with("call_"));
    assert_eq!(result.usage, Some(TokenUsage::new(20, 5, 25)));

    let requests = transport.requests();
    assert_eq!(
        requests[0].url,
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
    );
    assert_eq!(
        requests[0].auth,
        HttpAuth::Header {
            name: "x-goog-api-key",
            value: SecretString::new("AIza-test"),
        }
    );
    assert_eq!(
        requests[0].body["toolConfig"],
        json!({"functionCallingConfig": {"mode": "ANY", "allowedFunctionNames": ["openCanvas"]}})
    );
    assert_eq!(
        requests[0].body["tools"],
        json!([{"functionDeclarations": [{
            "name": "openCanvas",
            "description": "Open the drawing canvas",
            "parameters": {"type": "object", "properties": {}}
        }]}])
    );
}

#[tokio::test]
async fn text_is_the_first_non_empty_part_across_candidates() {
    let transport = RecordingTransport::replying(
        200,
        json!({
            "candidates": [
                {"content": {"parts": [{"text": ""}]}},
                {"content": {"parts": [{"text": "second"}, {"text": "third"}]}}
            ]
        }),
    );
    let adapter = adapter(transport);

    let result = adapter
        .generate(params("gemini-2.5-pro", vec![Message::user("hi")], GenerationOptions::default(), None))
        .await
        .expect("generation should succeed");

    assert_eq!(result.text, "second");
    assert!(result.tool_calls.is_empty());
    assert_eq!(result.usage, None);
}

#[tokio::test]
async fn missing_gemini_key_is_a_configuration_error() {
    let transport = RecordingTransport::replying(200, json!({}));
    let adapter = GoogleAdapter::new(credentials_with(&[]), transport.clone());

    let err = adapter
        .generate(params("gemini-2.5-flash", vec![Message::user("hi")], GenerationOptions::default(), None))
        .await
        .expect_err("missing key must fail");

    assert_eq!(err.kind, ProviderErrorKind::Configuration);
    assert_eq!(err.message, "GEMINI_API_KEY environment variable not set");
    assert!(transport.requests().is_empty());
}

#[test]
fn tool_arguments_survive_translate_then_parse() {
    let arguments = "{\"query\":\"café\",\"limit\":3,\"nested\":{\"ok\":false}}";
    let adapter = adapter(RecordingTransport::replying(200, json!({})));

    let request = adapter
        .translate(&params(
            "gemini-2.5-flash",
            vec![
                Message::user("search"),
                Message::assistant_with_tool_calls("", vec![ToolCall::new("c1", "search", arguments)]),
            ],
            GenerationOptions::default(),
            None,
        ))
        .expect("translate should succeed");
    let model_turn = serde_json::to_value(&request.contents[1]).expect("content should encode");

    let response = serde_json::from_value(json!({ "candidates": [{ "content": model_turn }] }))
        .expect("response should decode");
    let result = adapter.parse("gemini-2.5-flash", response, json!(null));

    let original: serde_json::Value = serde_json::from_str(arguments).expect("valid json");
    let round_tripped: serde_json::Value =
        serde_json::from_str(&result.tool_calls[0].arguments).expect("valid json");
    assert_eq!(round_tripped, original);
}
