//! Environment-backed provider configuration.
//!
//! ```rust
//! use pprovider::{ProviderConfig, ProviderId};
//!
//! let config = ProviderConfig::from_vars([
//!     ("OPENAI_API_KEY", "sk-test"),
//!     ("OLLAMA_BASE_URL", "http://gpu-box:11434/"),
//! ]);
//!
//! assert!(config.credentials().has_credentials(ProviderId::OpenAi).unwrap());
//! assert_eq!(config.ollama_base_url(), "http://gpu-box:11434");
//! ```

use std::ffi::OsString;
use std::sync::Arc;

use crate::{ProviderId, SecureCredentialManager};

pub const OLLAMA_BASE_URL_VAR: &str = "OLLAMA_BASE_URL";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    credentials: Arc<SecureCredentialManager>,
    ollama_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            credentials: Arc::new(SecureCredentialManager::new()),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads credentials and the Ollama base URL from the process environment.
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self::from_vars(utf8_pairs(std::env::vars_os()))
    }

    /// Builds a configuration from explicit key/value pairs. Empty values
    /// count as absent.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let config = Self::default();
        let mut ollama_base_url = None;

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            if value.is_empty() {
                continue;
            }

            if key == OLLAMA_BASE_URL_VAR {
                ollama_base_url = Some(value.to_string());
                continue;
            }

            if let Some(provider) = ProviderId::ALL
                .into_iter()
                .find(|provider| provider.credential_env_var() == Some(key))
            {
                // value is non-empty and the manager is not shared yet
                let _ = config.credentials.set_api_key(provider, value);
            }
        }

        match ollama_base_url {
            Some(url) => config.with_ollama_base_url(url),
            None => config,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<SecureCredentialManager>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_ollama_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.ollama_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(&self) -> &Arc<SecureCredentialManager> {
        &self.credentials
    }

    pub fn ollama_base_url(&self) -> &str {
        &self.ollama_base_url
    }
}

fn utf8_pairs(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
