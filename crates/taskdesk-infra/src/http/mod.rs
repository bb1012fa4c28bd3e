//! reqwest adapter for the task manager REST API.

mod client;
mod config;
pub mod dto;


pub use client::{ApiClient, REQUEST_ID_HEADER};
pub use config::{ApiConfig, ConfigError};
