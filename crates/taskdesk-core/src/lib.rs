//! # Taskdesk Core
//!
//! The domain layer of the taskdesk client.
//! Entities, ports and the session/query services live here; transport and
//! storage are supplied through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, ValidationErrors};
