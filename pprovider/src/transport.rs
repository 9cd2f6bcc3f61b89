//! HTTP transport seam shared by every provider adapter.
//!
//! Adapters build an [`HttpRequest`] and hand it to a [`ProviderTransport`].
//! The production implementation is [`ReqwestTransport`]; tests substitute
//! fakes that capture requests and return canned bodies.

use reqwest::Client;
use serde_json::Value;

use crate::{ProviderError, ProviderFuture, SecretString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Bearer(SecretString),
    Header {
        name: &'static str,
        value: SecretString,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub auth: HttpAuth,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            auth: HttpAuth::None,
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait ProviderTransport: Send + Sync + std::fmt::Debug {
    /// Sends one JSON POST. Non-success statuses are returned, not raised.
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ProviderTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            let mut builder = self.client.post(&request.url).json(&request.body);
            builder = match &request.auth {
                HttpAuth::None => builder,
                HttpAuth::Bearer(token) => builder.bearer_auth(token.expose()),
                HttpAuth::Header { name, value } => builder.header(*name, value.expose()),
            };
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }

            let response = builder.send().await.map_err(|err| {
                if err.is_timeout() {
                    ProviderError::transport(format!("request timed out: {err}"))
                } else {
                    ProviderError::transport(err.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            Ok(HttpResponse { status, body })
        })
    }
}
