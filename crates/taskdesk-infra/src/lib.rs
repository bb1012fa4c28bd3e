//! # Taskdesk Infrastructure
//!
//! Concrete implementations of the ports defined in `taskdesk-core`.
//! This crate contains the HTTP client for the task API and the token stores.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - HTTP client and token stores only
//! - `jwt` - Access token inspection via jsonwebtoken

pub mod http;
pub mod storage;

#[cfg(feature = "jwt")]
pub mod auth;

// Re-exports
pub use http::{ApiClient, ApiConfig};
pub use storage::{CookieJarStore, FileTokenStore, InMemoryTokenStore, TokenStoreConfig};

#[cfg(feature = "jwt")]
pub use auth::{AccessTokenInfo, JwtInspector};
