//! Typed REST clients for platform services.
//!
//! Each client wraps a [`BaseClient`] bound to one platform service. The base
//! client resolves endpoint URLs against the service's base URL (derived
//! from the session via [`Session::service_url`]) and authenticates every
//! request with the session's access token.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::session::Session;
use crate::token::AuthError;

pub mod environment;

pub use environment::{Environment, EnvironmentClient};

/// Error type for REST client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No access token could be obtained for the request.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The service could not be reached.
    #[error("network error: {message}")]
    Transport { message: String },

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// An endpoint or base URL is not a valid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Shared plumbing for service clients.
#[derive(Debug, Clone)]
pub struct BaseClient {
    session: Arc<Session>,
    http_client: reqwest::Client,
    base_url: Url,
}

impl BaseClient {
    /// Create a client for `service_name` using the session's profile.
    pub fn new(session: Arc<Session>, service_name: &str) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&session.service_url(service_name, ""))?;
        Ok(Self {
            session,
            http_client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Send requests to `base_url` instead of the session-derived service URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Send requests through `http_client`.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// The session requests are authenticated with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Base URL of the service, always with a trailing slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `endpoint` against the service base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Perform an authenticated GET and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let url = self.endpoint_url(endpoint)?;
        let token = self.session.access_token().await?;

        tracing::debug!("GET {}", url);
        let response = self
            .http_client
            .get(url.clone())
            .header(AUTHORIZATION, token.authorization_header())
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                message: format!("GET {} failed: {}", url, e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Transport {
            message: format!("failed to read response from {}: {}", url, e),
        })?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })
    }
}

/// Parse a base URL, appending a trailing slash so that joins extend the
/// path instead of replacing its last segment.
fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}
