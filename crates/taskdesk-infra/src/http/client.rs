use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use taskdesk_core::domain::{
    AuthTokens, Credentials, LoginGrant, NewTask, RefreshGrant, Registration, TaskPage, TaskPatch,
    TaskQuery, TokenKind,
};
use taskdesk_core::ports::{AuthApi, AuthError, TaskApi, TokenStore};
use taskdesk_core::ClientError;

use super::config::{ApiConfig, ConfigError};
use super::dto::{
    ApiErrorBody, CreateTaskRequest, LoginRequest, LoginResponse, RefreshResponse,
    RefreshTokenRequest, RegisterRequest, TaskListParams, TaskListResponse, UpdateTaskRequest,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the task manager API.
///
/// Every request carries the current access token (read from the token
/// store at send time) and the cookies held in the shared jar.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        jar: Arc<Jar>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .cookie_provider(jar)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.endpoint(segments))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request_id = Uuid::new_v4();
        let mut request = request.header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.tokens.get(TokenKind::Access).await {
            request = request.bearer_auth(token);
        }

        let request = request
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let span = tracing::debug_span!(
            "api_request",
            method = %request.method(),
            path = %request.url().path(),
            %request_id
        );

        async move {
            let response = self.http.execute(request).await.map_err(|e| {
                tracing::warn!(error = %e, "Request failed");
                ClientError::Network(e.to_string())
            })?;

            let status = response.status();
            tracing::debug!(status = status.as_u16(), "Response received");

            if status.is_success() {
                Ok(response)
            } else {
                Err(error_from_response(response).await)
            }
        }
        .instrument(span)
        .await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ClientError::Network(format!("Invalid response body: {e}")))
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return AuthError::SessionExpired.into();
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ClientError> {
        let body = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };

        let response: LoginResponse = self
            .send_json(self.request(Method::POST, &["auth", "login"]).json(&body))
            .await
            .map_err(|e| match e {
                ClientError::Auth(AuthError::SessionExpired) => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        Ok(LoginGrant {
            tokens: AuthTokens {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            },
            user: response.user,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let body = RegisterRequest {
            name: registration.name.trim().to_string(),
            email: registration.email.trim().to_string(),
            password: registration.password.clone(),
        };

        self.send(self.request(Method::POST, &["auth", "register"]).json(&body))
            .await?;
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, ClientError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        let response: RefreshResponse = self
            .send_json(self.request(Method::POST, &["auth", "refresh"]).json(&body))
            .await
            .map_err(|e| match e {
                ClientError::Auth(AuthError::SessionExpired) => {
                    AuthError::RefreshRejected("Unauthorized".to_string()).into()
                }
                ClientError::Server { status, message } if (400..500).contains(&status) => {
                    AuthError::RefreshRejected(message).into()
                }
                other => other,
            })?;

        Ok(RefreshGrant {
            access_token: response.access_token,
            user: response.user,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        self.send(self.request(Method::POST, &["auth", "logout"]).json(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage, ClientError> {
        let params = TaskListParams::from(query);
        let response: TaskListResponse = self
            .send_json(self.request(Method::GET, &["tasks"]).query(&params))
            .await?;

        Ok(TaskPage {
            tasks: response.tasks,
            total: response.total,
        })
    }

    async fn create(&self, task: &NewTask) -> Result<(), ClientError> {
        let body = CreateTaskRequest::from(task);
        self.send(self.request(Method::POST, &["tasks"]).json(&body))
            .await?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), ClientError> {
        let body = UpdateTaskRequest::from(patch);
        self.send(self.request(Method::PATCH, &["tasks", id]).json(&body))
            .await?;
        Ok(())
    }

    async fn toggle(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::PATCH, &["tasks", id, "toggle"]))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, &["tasks", id]))
            .await?;
        Ok(())
    }
}
