use std::sync::{Arc, Mutex};

use pprovider::{
    GenerationDispatcher, GenerationRequest, HttpRequest, HttpResponse, Message, ProviderConfig,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, ProviderTransport, ToolCall,
    ToolDefinition,
};
use serde_json::{Value, json};

/// Answers by URL so one transport can stand in for every provider.
#[derive(Debug, Default)]
struct RoutingTransport {
    routes: Vec<(&'static str, u16, Value)>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl RoutingTransport {
    fn with_route(mut self, url_fragment: &'static str, status: u16, body: Value) -> Self {
        self.routes.push((url_fragment, status, body));
        self
    }

    fn seen(&self) -> Vec<HttpRequest> {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl ProviderTransport for RoutingTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            let route = self
                .routes
                .iter()
                .find(|(fragment, _, _)| request.url.contains(fragment))
                .map(|(_, status, body)| HttpResponse::new(*status, body.to_string()));
            self.seen.lock().expect("seen lock").push(request);
            route.ok_or_else(|| ProviderError::transport("no route"))
        })
    }
}

fn all_providers_transport() -> RoutingTransport {
    RoutingTransport::default()
        .with_route(
            "/chat/completions",
            200,
            json!({"choices": [{"message": {"role": "assistant", "content": "from openai"}}]}),
        )
        .with_route(
            "/messages",
            200,
            json!({"content": [{"type": "text", "text": "from anthropic"}], "usage": {"input_tokens": 1, "output_tokens": 1}}),
        )
        .with_route(
            ":generateContent",
            200,
            json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "from google"}]}}]}),
        )
        .with_route(
            "/api/chat",
            200,
            json!({"message": {"role": "assistant", "content": "from ollama"}}),
        )
}

fn configured() -> ProviderConfig {
    ProviderConfig::from_vars([
        ("OPENAI_API_KEY", "sk-test"),
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("GEMINI_API_KEY", "AIza-test"),
    ])
}

#[tokio::test]
async fn every_provider_echoes_the_requested_provider_and_model() {
    let transport = Arc::new(all_providers_transport());
    let dispatcher = GenerationDispatcher::builder(transport.clone())
        .config(configured())
        .build();

    for (provider, model) in [
        (ProviderId::OpenAi, "gpt-4.1"),
        (ProviderId::Anthropic, "claude-haiku-4-5"),
        (ProviderId::Google, "gemini-2.5-pro"),
        (ProviderId::Ollama, "phi4-mini:latest"),
    ] {
        let result = dispatcher
            .generate(GenerationRequest::new(
                provider,
                model,
                vec![Message::system("Be nice."), Message::user("hello")],
            ))
            .await
            .expect("generation should succeed");

        assert_eq!(result.provider, provider);
        assert_eq!(result.model, model);
        assert_eq!(result.text, format!("from {provider}"));
    }

    assert_eq!(transport.seen().len(), 4);
}

#[tokio::test]
async fn anthropic_without_a_key_fails_with_zero_network_calls() {
    let transport = Arc::new(all_providers_transport());
    let dispatcher = GenerationDispatcher::builder(transport.clone())
        .config(ProviderConfig::from_vars([("OPENAI_API_KEY", "sk-test")]))
        .build();

    let err = dispatcher
        .generate(GenerationRequest::new(
            ProviderId::Anthropic,
            "claude-3-5-sonnet-latest",
            vec![Message::user("hi")],
        ))
        .await
        .expect_err("missing key must fail");

    assert_eq!(err.kind, ProviderErrorKind::Configuration);
    assert_eq!(err.status_hint(), 500);
    assert!(transport.seen().is_empty());
}

#[tokio::test]
async fn google_tool_request_forces_the_declared_function() {
    let transport = Arc::new(RoutingTransport::default().with_route(
        ":generateContent",
        200,
        json!({"candidates": [{"content": {"role": "model", "parts": [
            {"functionCall": {"name": "openCanvas", "args": {}}}
        ]}}]}),
    ));
    let dispatcher = GenerationDispatcher::builder(transport.clone())
        .config(configured())
        .build();

    let result = dispatcher
        .generate(
            GenerationRequest::new(
                ProviderId::Google,
                "gemini-2.5-flash",
                vec![Message::user("open the canvas please")],
            )
            .with_tools(vec![ToolDefinition::new("openCanvas")
                .with_description("Opens the canvas")
                .with_parameters(json!({"type": "object", "properties": {}}))]),
        )
        .await
        .expect("generation should succeed");

    let body = &transport.seen()[0].body;
    assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
    assert_eq!(
        body["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"],
        json!(["openCanvas"])
    );
    assert_eq!(result.tool_calls.len(), 1);
    assert_eq!(result.tool_calls[0].name, "openCanvas");
}

#[tokio::test]
async fn upstream_failures_surface_status_and_body_unchanged() {
    let transport = Arc::new(RoutingTransport::default().with_route(
        "/chat/completions",
        503,
        json!({"error": {"message": "overloaded"}}),
    ));
    let dispatcher = GenerationDispatcher::builder(transport.clone())
        .config(configured())
        .build();

    let err = dispatcher
        .generate(GenerationRequest::new(
            ProviderId::OpenAi,
            "gpt-4o-mini",
            vec![Message::user("hi")],
        ))
        .await
        .expect_err("503 must fail");

    assert_eq!(err.kind, ProviderErrorKind::Provider);
    assert_eq!(err.status_hint(), 503);
    assert_eq!(
        err.body.as_deref(),
        Some("{\"error\":{\"message\":\"overloaded\"}}")
    );
    assert_eq!(transport.seen().len(), 1);
}

#[tokio::test]
async fn tool_call_history_is_forwarded_with_structured_arguments() {
    let transport = Arc::new(all_providers_transport());
    let dispatcher = GenerationDispatcher::builder(transport.clone())
        .config(configured())
        .build();
    let history = vec![
        Message::user("what is in /srv?"),
        Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("call_7", "list_dir", "{\"path\":\"/srv\",\"hidden\":false}")],
        ),
        Message::tool_result("call_7", "www logs"),
    ];

    for provider in [ProviderId::Anthropic, ProviderId::Google, ProviderId::Ollama] {
        dispatcher
            .generate(GenerationRequest::new(provider, "any-model", history.clone()))
            .await
            .expect("generation should succeed");
    }

    let seen = transport.seen();
    let expected = json!({"path": "/srv", "hidden": false});
    assert_eq!(seen[0].body["messages"][1]["content"][0]["input"], expected);
    assert_eq!(
        seen[1].body["contents"][1]["parts"][0]["functionCall"]["args"],
        expected
    );
    assert_eq!(
        seen[2].body["messages"][1]["tool_calls"][0]["function"]["arguments"],
        expected
    );
}
