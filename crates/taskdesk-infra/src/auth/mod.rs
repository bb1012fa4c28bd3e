//! Access token inspection.

mod jwt;

pub use jwt::{AccessTokenInfo, JwtInspector};
