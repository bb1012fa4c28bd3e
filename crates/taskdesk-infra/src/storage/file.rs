//! Durable token storage in a small JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use taskdesk_core::domain::TokenKind;
use taskdesk_core::ports::{StorageError, TokenStore};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl TokenFile {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Stores `{"accessToken": .., "refreshToken": ..}` at a fixed path.
///
/// The file is read once and cached; every change rewrites it through a
/// temporary file and a rename. The file is deleted once both tokens are
/// removed.
pub struct FileTokenStore {
    path: PathBuf,
    cache: Mutex<Option<TokenFile>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> TokenFile {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                TokenFile::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => TokenFile::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read token file");
                TokenFile::default()
            }
        }
    }

    async fn persist(&self, tokens: &TokenFile) -> Result<(), StorageError> {
        if tokens.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(e.to_string())),
            };
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(tokens)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    async fn update(&self, kind: TokenKind, value: Option<&str>) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await);
        }
        let Some(tokens) = cache.as_mut() else {
            return Ok(());
        };

        let slot = tokens.slot(kind);
        let previous = slot.take();
        *slot = value.map(str::to_string);

        if let Err(e) = self.persist(tokens).await {
            *tokens.slot(kind) = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await);
        }
        cache.as_mut().and_then(|tokens| tokens.slot(kind).clone())
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), StorageError> {
        if value.is_empty() {
            return Err(StorageError::InvalidValue(format!(
                "{} must not be empty",
                kind.key()
            )));
        }
        self.update(kind, Some(value)).await
    }

    async fn remove(&self, kind: TokenKind) -> Result<(), StorageError> {
        self.update(kind, None).await
    }
}
