//! Application state - the services behind the console, wired once at startup.

use std::sync::Arc;

use reqwest::cookie::Jar;

use taskdesk_core::ports::TokenStore;
use taskdesk_core::services::{SessionStore, TaskActions, TaskQueryController};
use taskdesk_infra::http::ConfigError;
use taskdesk_infra::{ApiClient, CookieJarStore, JwtInspector};

use crate::config::AppConfig;
use crate::navigation::ConsoleNavigator;

pub struct AppState {
    pub session: SessionStore,
    pub tasks: TaskQueryController,
    pub actions: TaskActions,
    pub navigator: Arc<ConsoleNavigator>,
    /// Durable token store, read for `whoami`.
    pub tokens: Arc<dyn TokenStore>,
    pub inspector: JwtInspector,
}

impl AppState {
    /// Build the services. The session is still loading until
    /// `session.initialize()` runs.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let jar = Arc::new(Jar::default());
        let tokens = config.tokens.build();
        let cookies: Arc<dyn TokenStore> = Arc::new(CookieJarStore::new(
            jar.clone(),
            config.api.base_url.clone(),
        ));

        let api = Arc::new(ApiClient::new(&config.api, jar, tokens.clone())?);
        let navigator = Arc::new(ConsoleNavigator::new());

        let session = SessionStore::new(api.clone(), tokens.clone(), cookies, navigator.clone());
        let tasks = TaskQueryController::new(
            api.clone(),
            session.clone(),
            config.page_size,
            config.search_delay,
        );
        let actions = TaskActions::new(api.clone(), session.clone(), tasks.clone());

        tracing::info!(api = %api.base_url(), page_size = config.page_size, "Application state initialized");

        Ok(Self {
            session,
            tasks,
            actions,
            navigator,
            tokens,
            inspector: JwtInspector::new(),
        })
    }
}
