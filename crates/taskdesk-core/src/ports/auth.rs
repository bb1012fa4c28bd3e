//! Authentication ports.

use async_trait::async_trait;

use crate::domain::{Credentials, LoginGrant, RefreshGrant, Registration};
use crate::error::ClientError;

/// Remote authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token pair and the user profile.
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ClientError>;

    /// Create an account. Does not sign the user in.
    async fn register(&self, registration: &Registration) -> Result<(), ClientError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, ClientError>;

    /// Invalidate a refresh token server-side.
    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Refresh rejected: {0}")]
    RefreshRejected(String),
}
