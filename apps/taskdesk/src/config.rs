//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use taskdesk_core::services::{DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DELAY};
use taskdesk_infra::http::ConfigError;
use taskdesk_infra::{ApiConfig, TokenStoreConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub tokens: TokenStoreConfig,
    pub page_size: u32,
    pub search_delay: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiConfig::from_env()?,
            tokens: TokenStoreConfig::from_env(),
            page_size: env::var("TASKDESK_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            search_delay: env::var("TASKDESK_SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SEARCH_DELAY),
        })
    }
}
