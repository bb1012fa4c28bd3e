//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure and the view layer implement.

mod auth;
mod navigation;
mod storage;
mod tasks;

pub use auth::{AuthApi, AuthError};
pub use navigation::{Navigator, Route};
pub use storage::{StorageError, TokenStore};
pub use tasks::TaskApi;
