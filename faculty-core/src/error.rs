//! Top-level error types for the Faculty SDK.

use thiserror::Error;

use crate::clients::ClientError;
use crate::config::ConfigError;
use crate::datasets::PathError;
use crate::token::AuthError;

/// Top-level error type encompassing all SDK errors.
#[derive(Debug, Error)]
pub enum FacultyError {
    /// Error obtaining an access token.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Error resolving a profile.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a project path operation.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Error from a REST client.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}
