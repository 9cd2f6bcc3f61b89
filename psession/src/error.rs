//! Session-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pcommon::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    NotFound,
    Validation,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: SessionErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(id: &SessionId) -> Self {
        Self::new(SessionErrorKind::NotFound, format!("Session not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Validation, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Store, message)
    }

    pub fn status_hint(&self) -> u16 {
        match self.kind {
            SessionErrorKind::NotFound => 404,
            SessionErrorKind::Validation => 400,
            SessionErrorKind::Store => 500,
        }
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SessionError {}
