use async_trait::async_trait;

use crate::domain::TokenKind;

/// Token storage - abstraction over the token file, the cookie jar and
/// in-memory stores.
///
/// Only the session service writes through this trait; everything else
/// reads.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current value of a token, if one is stored and still valid.
    async fn get(&self, kind: TokenKind) -> Option<String>;

    /// Store or replace a token.
    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), StorageError>;

    /// Remove a token. Removing an absent token is not an error.
    async fn remove(&self, kind: TokenKind) -> Result<(), StorageError>;
}

/// Token storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
