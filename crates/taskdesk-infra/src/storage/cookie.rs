//! Token mirror in the HTTP client's cookie jar.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};

use taskdesk_core::domain::TokenKind;
use taskdesk_core::ports::{StorageError, TokenStore};

/// Writes the tokens as cookies scoped to the API origin so they travel with
/// every request the shared client makes.
pub struct CookieJarStore {
    jar: Arc<Jar>,
    url: Url,
    secure: bool,
}

impl CookieJarStore {
    pub fn new(jar: Arc<Jar>, url: Url) -> Self {
        let secure = url.scheme() == "https";
        Self { jar, url, secure }
    }

    fn cookie(&self, kind: TokenKind, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            kind.key(),
            value,
            max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

fn check_value(kind: TokenKind, value: &str) -> Result<(), StorageError> {
    let invalid = value.is_empty()
        || value
            .chars()
            .any(|c| c == ';' || c == ',' || c == '"' || c.is_whitespace() || c.is_control());
    if invalid {
        return Err(StorageError::InvalidValue(format!(
            "{} is not a valid cookie value",
            kind.key()
        )));
    }
    Ok(())
}

#[async_trait]
impl TokenStore for CookieJarStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        let header = header.to_str().ok()?;

        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == kind.key()).then(|| value.to_string())
        })
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), StorageError> {
        check_value(kind, value)?;
        let cookie = self.cookie(kind, value, kind.cookie_max_age().as_secs());
        self.jar.add_cookie_str(&cookie, &self.url);
        Ok(())
    }

    async fn remove(&self, kind: TokenKind) -> Result<(), StorageError> {
        let cookie = self.cookie(kind, "", 0);
        self.jar.add_cookie_str(&cookie, &self.url);
        Ok(())
    }
}
