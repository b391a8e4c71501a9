//! Access tokens and their issuance.
//!
//! This module provides:
//! - [`AccessToken`] - A short-lived bearer credential with an expiry
//! - [`TokenIssuer`] - Trait for exchanging a profile's client credentials for a token
//! - [`AuthError`] - Errors raised while obtaining a token

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Profile, Secret};

/// Error type for token issuance.
///
/// Issuance failures are propagated to the caller unchanged; nothing in the
/// crate retries them.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached.
    #[error("network error: {message}")]
    Transport { message: String },

    /// The token endpoint answered with a non-success status.
    #[error("token request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The token endpoint answered with a body that is not a token response.
    #[error("malformed token response: {message}")]
    Malformed { message: String },
}

/// A bearer access token with its expiry time.
///
/// Tokens are immutable values; two tokens are equal when both the token
/// string and the expiry are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The token value.
    pub token: Secret,

    /// When this token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Secret::new(token),
            expires_at,
        }
    }

    /// Whether the token is still valid at `now`.
    ///
    /// A token is valid strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Get the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }
}

/// Exchanges a profile's client credentials for a fresh access token.
///
/// The production implementation is [`HttpTokenIssuer`](crate::HttpTokenIssuer);
/// tests substitute their own.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Request a new access token for `profile`.
    async fn issue(&self, profile: &Profile) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_validity_boundary() {
        let now = Utc::now();
        let token = AccessToken::new("test", now + Duration::seconds(1));

        assert!(token.is_valid_at(now));
        assert!(!token.is_valid_at(now + Duration::seconds(1)));
        assert!(!token.is_valid_at(now + Duration::seconds(2)));
    }

    #[test]
    fn test_authorization_header() {
        let token = AccessToken::new("abc", Utc::now());
        assert_eq!(token.authorization_header(), "Bearer abc");
    }

    #[test]
    fn test_token_debug_redacted() {
        let token = AccessToken::new("very-secret-token", Utc::now());
        assert!(!format!("{:?}", token).contains("very-secret-token"));
    }
}
