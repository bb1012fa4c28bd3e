//! Session lifecycle: silent refresh on start, login, logout and expiry.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{AuthTokens, Credentials, Registration, Session, TokenKind, User};
use crate::error::ClientError;
use crate::ports::{AuthApi, AuthError, Navigator, Route, TokenStore};
use crate::validation;

/// Owner of the signed-in user and of the persisted tokens.
///
/// Cheap to clone; clones share state. Tokens are written to two stores:
/// the durable `storage` read by the HTTP adapter, and `cookies`, the
/// server-visible mirror.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    auth: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStore>,
    cookies: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
}

struct SessionState {
    user: Option<User>,
    loading: bool,
}

impl SessionStore {
    /// Create a store in the loading state. Call [`initialize`](Self::initialize) next.
    pub fn new(
        auth: Arc<dyn AuthApi>,
        storage: Arc<dyn TokenStore>,
        cookies: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                storage,
                cookies,
                navigator,
                state: RwLock::new(SessionState {
                    user: None,
                    loading: true,
                }),
            }),
        }
    }

    /// Try to resume the previous session with the stored refresh token.
    ///
    /// Never fails: on any error the session simply stays signed out. A
    /// refresh rejected by the server also wipes the stored tokens, a
    /// transport failure keeps them for the next attempt.
    pub async fn initialize(&self) {
        let user = match self.inner.storage.get(TokenKind::Refresh).await {
            None => {
                tracing::debug!("No stored refresh token, starting signed out");
                None
            }
            Some(refresh_token) => self.resume(&refresh_token).await,
        };

        let mut state = self.inner.state.write().await;
        state.user = user;
        state.loading = false;
    }

    async fn resume(&self, refresh_token: &str) -> Option<User> {
        match self.inner.auth.refresh(refresh_token).await {
            Ok(grant) => match self.store_resumed(&grant.access_token, refresh_token).await {
                Ok(()) => {
                    tracing::info!(user = %grant.user.display_name(), "Session resumed");
                    Some(grant.user)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to persist refreshed access token");
                    None
                }
            },
            Err(ClientError::Network(e)) => {
                tracing::warn!(error = %e, "Session refresh unreachable, keeping stored tokens");
                None
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored session rejected");
                self.clear_tokens().await;
                None
            }
        }
    }

    /// Sign in. Validation failures never reach the network; any rejection
    /// by the server is reported as [`AuthError::InvalidCredentials`].
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        validation::validate_login(credentials)?;

        let grant = self
            .inner
            .auth
            .login(credentials)
            .await
            .map_err(|e| match e {
                ClientError::Network(_) => e,
                ClientError::Server { status, .. } if status >= 500 => e,
                _ => AuthError::InvalidCredentials.into(),
            })?;

        self.store_tokens(&grant.tokens).await?;

        {
            let mut state = self.inner.state.write().await;
            state.user = Some(grant.user.clone());
            state.loading = false;
        }

        tracing::info!(user = %grant.user.display_name(), "Logged in");
        self.inner.navigator.navigate(Route::Dashboard);
        Ok(grant.user)
    }

    /// Create an account and send the user to the login entry point.
    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        validation::validate_registration(registration)?;

        self.inner.auth.register(registration).await?;

        tracing::info!(email = %registration.email, "Account created");
        self.inner.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Sign out. The server call is best-effort; local state is always
    /// cleared.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.inner.storage.get(TokenKind::Refresh).await {
            if let Err(e) = self.inner.auth.logout(&refresh_token).await {
                tracing::warn!(error = %e, "Server-side logout failed");
            }
        }

        self.clear_local().await;
        tracing::info!("Logged out");
        self.inner.navigator.navigate(Route::Login);
    }

    /// Drop a session the server no longer accepts.
    pub async fn expire(&self) {
        self.clear_local().await;
        tracing::info!("Session expired");
        self.inner.navigator.navigate(Route::Login);
    }

    /// Expire the session when `err` says it is no longer valid, then hand
    /// the error back.
    pub async fn check_error(&self, err: ClientError) -> ClientError {
        if err.is_session_expired() {
            self.expire().await;
        }
        err
    }

    /// Route gate: the signed-in user, or a redirect to login.
    pub async fn require_user(&self) -> Result<User, ClientError> {
        let (user, loading) = {
            let state = self.inner.state.read().await;
            (state.user.clone(), state.loading)
        };

        match user {
            Some(user) => Ok(user),
            None => {
                if !loading {
                    self.inner.navigator.navigate(Route::Login);
                }
                Err(AuthError::NotAuthenticated.into())
            }
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.user.is_some()
    }

    pub async fn snapshot(&self) -> Session {
        let (user, loading) = {
            let state = self.inner.state.read().await;
            (state.user.clone(), state.loading)
        };

        Session {
            user,
            access_token: self.inner.storage.get(TokenKind::Access).await,
            refresh_token: self.inner.storage.get(TokenKind::Refresh).await,
            loading,
        }
    }

    async fn store_tokens(&self, tokens: &AuthTokens) -> Result<(), ClientError> {
        self.store_token(TokenKind::Access, &tokens.access_token)
            .await?;
        self.store_token(TokenKind::Refresh, &tokens.refresh_token)
            .await
    }

    /// The cookie jar does not outlive the process, so the refresh cookie is
    /// rewritten along with the new access token.
    async fn store_resumed(&self, access_token: &str, refresh_token: &str) -> Result<(), ClientError> {
        self.store_token(TokenKind::Access, access_token).await?;
        self.inner.cookies.set(TokenKind::Refresh, refresh_token).await?;
        Ok(())
    }

    async fn store_token(&self, kind: TokenKind, value: &str) -> Result<(), ClientError> {
        self.inner.storage.set(kind, value).await?;
        self.inner.cookies.set(kind, value).await?;
        Ok(())
    }

    async fn clear_local(&self) {
        self.clear_tokens().await;

        let mut state = self.inner.state.write().await;
        state.user = None;
        state.loading = false;
    }

    /// Remove every token from both stores, continuing past failures.
    async fn clear_tokens(&self) {
        for kind in TokenKind::ALL {
            for store in [&self.inner.storage, &self.inner.cookies] {
                if let Err(e) = store.remove(kind).await {
                    tracing::error!(token = kind.key(), error = %e, "Failed to clear token");
                }
            }
        }
    }
}
