//! Default and suggested models per provider, plus `provider:model` id parsing.
//!
//! ```rust
//! use pprovider::{ProviderId, resolve_model_id};
//!
//! let resolved = resolve_model_id(Some("ollama:gpt-oss:20b"));
//! assert_eq!(resolved.provider, ProviderId::Ollama);
//! assert_eq!(resolved.model, "gpt-oss:20b");
//!
//! let fallback = resolve_model_id(Some("nonsense"));
//! assert_eq!(fallback.raw_id, "openai:gpt-4o-mini");
//! ```

use serde::{Deserialize, Serialize};

use crate::ProviderId;

pub const DEFAULT_MODEL_ID: &str = "openai:gpt-4o-mini";

pub fn default_model(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAi => "gpt-4o-mini",
        ProviderId::Anthropic => "claude-3-5-sonnet-latest",
        ProviderId::Google => "gemini-2.5-flash",
        ProviderId::Ollama => "gpt-oss:20b",
    }
}

pub fn suggested_models(provider: ProviderId) -> &'static [&'static str] {
    match provider {
        ProviderId::OpenAi => &[
            "gpt-5",
            "gpt-5-mini",
            "gpt-5-nano",
            "gpt-4.1",
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-4.1-mini",
        ],
        ProviderId::Anthropic => &[
            "claude-3-5-sonnet-latest",
            "claude-3-5-haiku-latest",
            "claude-sonnet-4-5",
            "claude-haiku-4-5",
            "claude-opus-4-1-20250805",
        ],
        ProviderId::Google => &["gemini-2.5-pro", "gemini-2.5-flash"],
        ProviderId::Ollama => &["gpt-oss:20b", "qwen3:30b", "phi4-mini:latest"],
    }
}

/// Availability entry reported for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAvailability {
    pub provider: ProviderId,
    pub has_credentials: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_models: Option<Vec<String>>,
}

impl ProviderAvailability {
    pub fn from_catalog(provider: ProviderId, has_credentials: bool) -> Self {
        Self {
            provider,
            has_credentials,
            default_model: Some(default_model(provider).to_string()),
            suggested_models: Some(
                suggested_models(provider)
                    .iter()
                    .map(|model| model.to_string())
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModel {
    pub provider: ProviderId,
    pub model: String,
    pub raw_id: String,
}

impl Default for ResolvedModel {
    fn default() -> Self {
        Self {
            provider: ProviderId::OpenAi,
            model: default_model(ProviderId::OpenAi).to_string(),
            raw_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

/// Parses `provider:model`, splitting on the first `:` so model tags such as
/// `gpt-oss:20b` survive. Anything malformed resolves to the default model.
pub fn resolve_model_id(model_id: Option<&str>) -> ResolvedModel {
    let Some(trimmed) = model_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return ResolvedModel::default();
    };

    let Some((provider, model)) = trimmed.split_once(':') else {
        return ResolvedModel::default();
    };
    let model = model.trim();
    if provider.is_empty() || model.is_empty() {
        return ResolvedModel::default();
    }

    match provider.parse::<ProviderId>() {
        Ok(provider) => ResolvedModel {
            provider,
            model: model.to_string(),
            raw_id: trimmed.to_string(),
        },
        Err(_) => ResolvedModel::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_well_formed_ids() {
        let resolved = resolve_model_id(Some("  anthropic:claude-haiku-4-5 "));
        assert_eq!(
            resolved,
            ResolvedModel {
                provider: ProviderId::Anthropic,
                model: "claude-haiku-4-5".to_string(),
                raw_id: "anthropic:claude-haiku-4-5".to_string(),
            }
        );
    }

    #[test]
    fn malformed_ids_fall_back_to_default() {
        for input in [None, Some(""), Some("   "), Some("gpt-4o"), Some(":gpt-4o"), Some("openai:  "), Some("mistral:large")] {
            assert_eq!(resolve_model_id(input), ResolvedModel::default(), "input {input:?}");
        }
    }

    #[test]
    fn every_default_model_is_also_suggested() {
        for provider in ProviderId::ALL {
            assert!(suggested_models(provider).contains(&default_model(provider)));
        }
    }

    #[test]
    fn availability_serializes_camel_case() {
        let entry = ProviderAvailability::from_catalog(ProviderId::Google, false);
        let value = serde_json::to_value(&entry).expect("entry should serialize");

        assert_eq!(value["provider"], "google");
        assert_eq!(value["hasCredentials"], false);
        assert_eq!(value["defaultModel"], "gemini-2.5-flash");
        assert_eq!(value["suggestedModels"][0], "gemini-2.5-pro");
    }
}
