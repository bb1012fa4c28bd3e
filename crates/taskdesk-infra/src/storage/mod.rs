//! Token stores - JSON file, in-memory fallback and the HTTP cookie jar.

mod cookie;
mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use taskdesk_core::ports::TokenStore;

pub use cookie::CookieJarStore;
pub use file::FileTokenStore;
pub use memory::InMemoryTokenStore;

const MEMORY_SENTINEL: &str = ":memory:";

/// Where the durable copy of the tokens lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreConfig {
    File(PathBuf),
    /// Tokens are lost when the process exits.
    Memory,
}

impl TokenStoreConfig {
    /// Reads `TASKDESK_TOKEN_FILE`, defaulting to `$HOME/.taskdesk/tokens.json`.
    /// The value `:memory:` selects the in-memory store.
    pub fn from_env() -> Self {
        match std::env::var("TASKDESK_TOKEN_FILE") {
            Ok(path) if path.trim() == MEMORY_SENTINEL => Self::Memory,
            Ok(path) if !path.trim().is_empty() => Self::File(PathBuf::from(path.trim())),
            _ => match std::env::var_os("HOME") {
                Some(home) => Self::File(PathBuf::from(home).join(".taskdesk").join("tokens.json")),
                None => {
                    tracing::warn!("HOME is not set, tokens will not survive a restart");
                    Self::Memory
                }
            },
        }
    }

    pub fn build(&self) -> Arc<dyn TokenStore> {
        match self {
            Self::File(path) => {
                tracing::info!(path = %path.display(), "Using token file");
                Arc::new(FileTokenStore::new(path.clone()))
            }
            Self::Memory => {
                tracing::info!("Using in-memory token store");
                Arc::new(InMemoryTokenStore::new())
            }
        }
    }
}
