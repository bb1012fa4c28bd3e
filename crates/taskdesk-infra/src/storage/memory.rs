//! In-memory token store - used when no token file is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskdesk_core::domain::TokenKind;
use taskdesk_core::ports::{StorageError, TokenStore};

/// Token store backed by a HashMap with an async RwLock.
///
/// Note: tokens are lost on process restart.
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<TokenKind, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().await.get(&kind).cloned()
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), StorageError> {
        if value.is_empty() {
            return Err(StorageError::InvalidValue(format!("empty {}", kind.key())));
        }
        self.tokens.write().await.insert(kind, value.to_string());
        Ok(())
    }

    async fn remove(&self, kind: TokenKind) -> Result<(), StorageError> {
        self.tokens.write().await.remove(&kind);
        Ok(())
    }
}
