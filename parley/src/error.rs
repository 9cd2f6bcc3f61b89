//! Facade error wrapping provider and session failures.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pprovider::ProviderError;
use psession::SessionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Provider(ProviderError),
    Session(SessionError),
}

impl ServiceError {
    /// HTTP status an outer transport layer would answer with.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Provider(error) => error.status_hint(),
            Self::Session(error) => error.status_hint(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Provider(error) => &error.message,
            Self::Session(error) => &error.message,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(error) => write!(f, "provider error: {error}"),
            Self::Session(error) => write!(f, "session error: {error}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider(error) => Some(error),
            Self::Session(error) => Some(error),
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<SessionError> for ServiceError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}
