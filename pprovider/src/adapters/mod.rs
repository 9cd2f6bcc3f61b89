pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{HttpRequest, ProviderError, ProviderId, ProviderTransport};

/// Encodes a wire request body.
pub(crate) fn to_body<T: Serialize>(
    provider: ProviderId,
    request: &T,
) -> Result<Value, ProviderError> {
    serde_json::to_value(request).map_err(|err| {
        ProviderError::validation(format!(
            "{} request could not be encoded: {err}",
            provider.display_name()
        ))
    })
}

/// Performs one exchange and decodes a success body into `T`, returning the
/// untouched JSON alongside it.
pub(crate) async fn exchange<T: DeserializeOwned>(
    transport: &dyn ProviderTransport,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<(T, Value), ProviderError> {
    tracing::debug!(provider = %provider, url = %request.url, "sending provider request");
    let response = transport.post_json(request).await?;

    if !response.is_success() {
        tracing::debug!(provider = %provider, status = response.status, "provider returned an error status");
        return Err(ProviderError::provider(
            response.status,
            format!(
                "{} API error: {} - {}",
                provider.display_name(),
                response.status,
                response.body
            ),
            response.body,
        ));
    }

    let raw: Value = serde_json::from_str(&response.body).map_err(|err| {
        ProviderError::transport(format!(
            "{} returned a body that is not JSON: {err}",
            provider.display_name()
        ))
    })?;
    let decoded = T::deserialize(&raw).map_err(|err| {
        ProviderError::transport(format!(
            "{} returned an unexpected response shape: {err}",
            provider.display_name()
        ))
    })?;

    Ok((decoded, raw))
}

pub(crate) fn generated_call_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}
