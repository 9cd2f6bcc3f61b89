#![cfg(test)]

use std::sync::Arc;

use pcommon::GenerationOptions;
use serde_json::json;

use crate::adapters::test_support::{RecordingTransport, credentials_with, params};
use crate::{
    HttpAuth, Message, ProviderAdapter, ProviderErrorKind, ProviderId, SecretString, TokenUsage,
    ToolCall, ToolDefinition,
};

use super::provider::AnthropicAdapter;

fn adapter(transport: Arc<RecordingTransport>) -> AnthropicAdapter {
    AnthropicAdapter::new(
        credentials_with(&[(ProviderId::Anthropic, "sk-ant-test")]),
        transport,
    )
}

#[test]
fn translate_moves_system_text_and_maps_tool_turns() {
    let adapter = adapter(RecordingTransport::replying(200, json!({})));
    let request = adapter
        .translate(&params(
            "claude-3-5-sonnet-latest",
            vec![
                Message::system("Rule one."),
                Message::user("weather?"),
                Message::assistant_with_tool_calls(
                    "Checking.",
                    vec![ToolCall::new("toolu_1", "get_weather", "{\"city\":\"Oslo\"}")],
                ),
                Message::tool_result("toolu_1", "rainy"),
                Message::system("Rule two."),
            ],
            GenerationOptions::default(),
            None,
        ))
        .expect("translate should succeed");

    let body = serde_json::to_value(&request).expect("request should encode");
    assert_eq!(
        body,
        json!({
            "model": "claude-3-5-sonnet-latest",
            "max_tokens": 1024,
            "system": "Rule one.\n\nRule two.",
            "messages": [
                {"role": "user", "content": [{"type": "text", "text": "weather?"}]},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Checking."},
                    {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"city": "Oslo"}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "toolu_1", "content": "rainy"}
                ]}
            ]
        })
    );
}

#[test]
fn translate_defaults_missing_tool_schema_and_respects_caller_options() {
    let adapter = adapter(RecordingTransport::replying(200, json!({})));
    let request = adapter
        .translate(&params(
            "claude-haiku-4-5",
            vec![Message::user("hi")],
            GenerationOptions::default()
                .with_max_tokens(64)
                .with_temperature(1.0)
                .with_top_p(0.5),
            Some(vec![ToolDefinition::new("noop")]),
        ))
        .expect("translate should succeed");

    let body = serde_json::to_value(&request).expect("request should encode");
    assert_eq!(body["max_tokens"], json!(64));
    assert_eq!(body["temperature"], json!(1.0));
    assert_eq!(body["top_p"], json!(0.5));
    assert!(body.get("system").is_none());
    assert_eq!(
        body["tools"],
        json!([{"name": "noop", "input_schema": {"type": "object", "properties": {}}}])
    );
}

#[test]
fn translate_rejects_unparseable_tool_arguments() {
    let adapter = adapter(RecordingTransport::replying(200, json!({})));
    let err = adapter
        .translate(&params(
            "claude-3-5-sonnet-latest",
            vec![
                Message::user("go"),
                Message::assistant_with_tool_calls("", vec![ToolCall::new("t1", "x", "{oops")]),
            ],
            GenerationOptions::default(),
            None,
        ))
        .expect_err("bad arguments must fail");

    assert_eq!(err.kind, ProviderErrorKind::Validation);
}

#[tokio::test]
async fn generate_sends_version_header_and_joins_text_blocks() {
    let transport = RecordingTransport::replying(
        200,
        json!({
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Hello, "},
                {"type": "tool_use", "id": "toolu_9", "name": "openCanvas", "input": {"mode": "draw"}},
                {"type": "text", "text": "world"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 4}
        }),
    );
    let adapter = adapter(transport.clone());

    let result = adapter
        .generate(params(
            "claude-3-5-sonnet-latest",
            vec![Message::user("hi")],
            GenerationOptions::default(),
            None,
        ))
        .await
        .expect("generation should succeed");

    assert_eq!(result.provider, ProviderId::Anthropic);
    assert_eq!(result.model, "claude-3-5-sonnet-latest");
    assert_eq!(result.text, "Hello, world");
    assert_eq!(
        result.tool_calls,
        vec![ToolCall::new("toolu_9", "openCanvas", "{\"mode\":\"draw\"}")]
    );
    assert_eq!(result.usage, Some(TokenUsage::new(10, 4, 14)));

    let requests = transport.requests();
    assert_eq!(requests[0].url, "https://api.anthropic.com/v1/messages");
    assert_eq!(
        requests[0].auth,
        HttpAuth::Header {
            name: "x-api-key",
            value: SecretString::new("sk-ant-test"),
        }
    );
    assert_eq!(
        requests[0].headers,
        vec![("anthropic-version", "2023-06-01".to_string())]
    );
}

#[tokio::test]
async fn missing_key_never_reaches_the_transport() {
    let transport = RecordingTransport::replying(200, json!({}));
    let adapter = AnthropicAdapter::new(credentials_with(&[]), transport.clone());

    let err = adapter
        .generate(params(
            "claude-3-5-sonnet-latest",
            vec![Message::user("hi")],
            GenerationOptions::default(),
            None,
        ))
        .await
        .expect_err("missing key must fail");

    assert_eq!(err.kind, ProviderErrorKind::Configuration);
    assert_eq!(err.message, "ANTHROPIC_API_KEY environment variable not set");
    assert!(transport.requests().is_empty());
}

#[test]
fn tool_arguments_survive_translate_then_parse() {
    let arguments = "{\"path\":\"/tmp/a b\",\"depth\":2,\"flags\":[true,null]}";
    let call = ToolCall::new("toolu_rt", "scan", arguments);
    let adapter = adapter(RecordingTransport::replying(200, json!({})));

    let request = adapter
        .translate(&params(
            "claude-3-5-sonnet-latest",
            vec![
                Message::user("scan"),
                Message::assistant_with_tool_calls("", vec![call.clone()]),
            ],
            GenerationOptions::default(),
            None,
        ))
        .expect("translate should succeed");
    let wire = serde_json::to_value(&request.messages[1].content).expect("blocks should encode");

    let response = serde_json::from_value(json!({ "content": wire })).expect("blocks should decode");
    let result = adapter.parse("claude-3-5-sonnet-latest", response, json!(null));

    let original: serde_json::Value = serde_json::from_str(arguments).expect("valid json");
    let round_tripped: serde_json::Value =
        serde_json::from_str(&result.tool_calls[0].arguments).expect("valid json");
    assert_eq!(round_tripped, original);
    assert_eq!(result.tool_calls[0].name, "scan");
}

#[tokio::test]
async fn oversized_usage_saturates_the_total() {
    let transport = RecordingTransport::replying(
        200,
        json!({
            "content": [{"type": "text", "text": "long"}],
            "usage": {"input_tokens": 4_000_000_000u32, "output_tokens": 400_000_000u32}
        }),
    );

    let result = adapter(transport)
        .generate(params(
            "claude-3-5-sonnet-latest",
            vec![Message::user("hi")],
            GenerationOptions::default(),
            None,
        ))
        .await
        .expect("generation should succeed");

    assert_eq!(
        result.usage,
        Some(TokenUsage::new(4_000_000_000, 400_000_000, u32::MAX))
    );
}
