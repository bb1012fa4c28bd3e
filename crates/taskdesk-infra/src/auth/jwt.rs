//! Client-side view of the access token's claims.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

/// Claims read from the access token payload.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// What the client knows about its access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenInfo {
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessTokenInfo {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Time left before expiry; `None` when the token carries no `exp`.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.expires_at
            .map(|exp| (exp - now).max(TimeDelta::zero()))
    }
}

/// Reads `sub` and `exp` from an access token.
///
/// The signing secret belongs to the server, so the signature is not
/// checked. The result is informational only and never decides whether the
/// session is valid.
pub struct JwtInspector {
    validation: Validation,
    key: DecodingKey,
}

impl JwtInspector {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            validation,
            key: DecodingKey::from_secret(&[]),
        }
    }

    /// `None` for anything that is not a decodable JWT.
    pub fn inspect(&self, token: &str) -> Option<AccessTokenInfo> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Some(AccessTokenInfo {
                subject: data.claims.sub,
                expires_at: data
                    .claims
                    .exp
                    .and_then(|exp| DateTime::from_timestamp(exp, 0)),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Access token is not an inspectable JWT");
                None
            }
        }
    }
}

impl Default for JwtInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct ServerClaims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    fn server_token(exp: DateTime<Utc>) -> String {
        let claims = ServerClaims {
            sub: "user-42".to_string(),
            exp: exp.timestamp(),
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-only-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_inspect_reads_claims_without_the_secret() {
        let exp = DateTime::from_timestamp(Utc::now().timestamp() + 3600, 0).unwrap();
        let info = JwtInspector::new().inspect(&server_token(exp)).unwrap();

        assert_eq!(info.subject.as_deref(), Some("user-42"));
        assert_eq!(info.expires_at, Some(exp));
        assert!(!info.is_expired(Utc::now()));
        assert!(info.remaining(Utc::now()).unwrap() > TimeDelta::minutes(59));
    }

    #[test]
    fn test_expired_token_is_still_inspectable() {
        let exp = Utc::now() - TimeDelta::hours(2);
        let info = JwtInspector::new().inspect(&server_token(exp)).unwrap();

        assert!(info.is_expired(Utc::now()));
        assert_eq!(info.remaining(Utc::now()), Some(TimeDelta::zero()));
    }

    #[test]
    fn test_inspect_invalid_token() {
        let inspector = JwtInspector::new();

        assert_eq!(inspector.inspect("invalid-token"), None);
        assert_eq!(inspector.inspect("access-1"), None);
        assert_eq!(inspector.inspect(""), None);
    }
}
