//! Client-level error types.

use std::fmt;

use thiserror::Error;

use crate::ports::{AuthError, StorageError};

/// Errors surfaced to the view layer.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Generic notification text for this failure.
    ///
    /// Never includes server detail, so a failed login cannot reveal whether
    /// an account exists.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "Please fix the highlighted fields",
            ClientError::Auth(AuthError::InvalidCredentials) => "Invalid credentials",
            ClientError::Auth(AuthError::NotAuthenticated) => "Please log in to continue",
            ClientError::Auth(_) => "Session expired, please log in again",
            ClientError::Network(_) | ClientError::Server { .. } | ClientError::Storage(_) => {
                "Something went wrong"
            }
        }
    }

    /// True when the failure means the current session is no longer valid.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::Auth(AuthError::SessionExpired))
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All field errors of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message reported for `field`, if that field failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
