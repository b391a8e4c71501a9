//! HTTP implementation of the [`TokenIssuer`] trait.
//!
//! [`HttpTokenIssuer`] performs the OAuth client-credentials grant against the
//! platform's authentication service (`hudson`):
//!
//! ```text
//! POST {protocol}://hudson.{domain}/access_token
//! {"client_id": "...", "client_secret": "...", "grant_type": "client_credentials"}
//! ```
//!
//! The response `{"access_token": "...", "expires_in": 600}` becomes an
//! [`AccessToken`] expiring `expires_in` seconds from now.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use faculty_core::{HttpTokenIssuer, Profile, TokenIssuer};
//!
//! let profile = Profile::new("services.example.com", "https", "id", "secret");
//! let token = HttpTokenIssuer::new().issue(&profile).await?;
//! println!("Token expires at {}", token.expires_at);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Profile;
use crate::token::{AccessToken, AuthError, TokenIssuer};

/// Name of the platform's authentication service.
pub const AUTH_SERVICE: &str = "hudson";

const GRANT_TYPE: &str = "client_credentials";

#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Token issuer that calls the platform's token endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTokenIssuer {
    http_client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpTokenIssuer {
    /// Create an issuer with a default HTTP client.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create an issuer that sends requests through `http_client`.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            endpoint: None,
        }
    }

    /// Send token requests to `endpoint` instead of the URL derived from the
    /// profile.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The token endpoint used for `profile`.
    pub fn token_url(&self, profile: &Profile) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}/access_token", profile.service_base(AUTH_SERVICE)),
        }
    }
}

impl Default for HttpTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn issue(&self, profile: &Profile) -> Result<AccessToken, AuthError> {
        let url = self.token_url(profile);
        tracing::debug!("Requesting access token for {} from {}", profile, url);

        let payload = AccessTokenRequest {
            client_id: &profile.client_id,
            client_secret: profile.client_secret.expose(),
            grant_type: GRANT_TYPE,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuthError::Transport {
                message: format!("token request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AuthError::Transport {
            message: format!("failed to read token response: {}", e),
        })?;

        if !status.is_success() {
            tracing::warn!(
                "Token request for {} rejected with status {}",
                profile,
                status
            );
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AccessTokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Malformed {
                message: e.to_string(),
            })?;

        let lifetime =
            Duration::try_seconds(parsed.expires_in).ok_or_else(|| AuthError::Malformed {
                message: format!("invalid expires_in: {}", parsed.expires_in),
            })?;

        let expires_at = Utc::now()
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::Malformed {
                message: format!("expires_in out of range: {}", parsed.expires_in),
            })?;

        let token = AccessToken::new(parsed.access_token, expires_at);
        tracing::info!(
            "Obtained access token for {} expiring at {}",
            profile,
            token.expires_at
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new("test.domain.com", "https", "id", "secret")
    }

    #[test]
    fn test_token_url_from_profile() {
        let issuer = HttpTokenIssuer::new();
        assert_eq!(
            issuer.token_url(&profile()),
            "https://hudson.test.domain.com/access_token"
        );
    }

    #[test]
    fn test_token_url_override() {
        let issuer = HttpTokenIssuer::new().with_endpoint("http://127.0.0.1:9000/access_token");
        assert_eq!(issuer.token_url(&profile()), "http://127.0.0.1:9000/access_token");
    }

    #[test]
    fn test_request_body_shape() {
        let profile = profile();
        let payload = AccessTokenRequest {
            client_id: &profile.client_id,
            client_secret: profile.client_secret.expose(),
            grant_type: GRANT_TYPE,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "client_id": "id",
                "client_secret": "secret",
                "grant_type": "client_credentials",
            })
        );
    }
}
