//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use pprovider::{ProviderError, ProviderErrorKind};
//!
//! let missing = ProviderError::configuration("ANTHROPIC_API_KEY environment variable not set");
//! assert_eq!(missing.kind, ProviderErrorKind::Configuration);
//! assert_eq!(missing.status_hint(), 500);
//!
//! let upstream = ProviderError::provider(429, "OpenAI API error: 429", "{\"error\":{}}");
//! assert_eq!(upstream.status, Some(429));
//! assert_eq!(upstream.status_hint(), 429);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// A credential or setting required by the selected provider is missing.
    Configuration,
    /// The request was rejected before any network call was made.
    Validation,
    /// The provider answered with a non-success status.
    Provider,
    /// The exchange failed at the network level or the body could not be decoded.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Validation, message)
    }

    pub fn provider(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Provider,
            message: message.into(),
            status: Some(status),
            body: Some(body.into()),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    /// Status code an outer HTTP layer should answer with.
    pub fn status_hint(&self) -> u16 {
        match self.kind {
            ProviderErrorKind::Configuration => 500,
            ProviderErrorKind::Validation => 400,
            ProviderErrorKind::Provider => self.status.unwrap_or(502),
            ProviderErrorKind::Transport => 502,
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}
