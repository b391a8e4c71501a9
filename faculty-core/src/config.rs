//! Profile resolution.
//!
//! A [`Profile`] is assembled from a [`ProfileQuery`] by a [`ProfileResolver`].
//! The [`DefaultProfileResolver`] layers each field from, highest priority
//! first:
//!
//! 1. the explicit query fields
//! 2. environment variables (`FACULTY_DOMAIN`, `FACULTY_PROTOCOL`,
//!    `FACULTY_CLIENT_ID`, `FACULTY_CLIENT_SECRET`)
//! 3. a TOML credentials file, one table per profile name
//! 4. built-in defaults for `domain` and `protocol`
//!
//! The credentials file location comes from the query, then
//! `FACULTY_CREDENTIALS_PATH`, then `<config dir>/faculty/credentials.toml`.
//! The profile name comes from the query, then `FACULTY_PROFILE`, then
//! `default`.
//!
//! ```toml
//! [default]
//! domain = "services.cloud.my.faculty.ai"
//! client_id = "my-client-id"
//! client_secret = "my-client-secret"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{Profile, Secret};

/// Domain used when no other source provides one.
pub const DEFAULT_DOMAIN: &str = "services.cloud.my.faculty.ai";

/// Protocol used when no other source provides one.
pub const DEFAULT_PROTOCOL: &str = "https";

/// Profile name used when none is requested.
pub const DEFAULT_PROFILE: &str = "default";

const ENV_CREDENTIALS_PATH: &str = "FACULTY_CREDENTIALS_PATH";
const ENV_PROFILE: &str = "FACULTY_PROFILE";
const ENV_DOMAIN: &str = "FACULTY_DOMAIN";
const ENV_PROTOCOL: &str = "FACULTY_PROTOCOL";
const ENV_CLIENT_ID: &str = "FACULTY_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "FACULTY_CLIENT_SECRET";

/// Error type for profile resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credentials file exists but could not be read.
    #[error("failed to read credentials file {path:?}: {message}")]
    CredentialsFile { path: PathBuf, message: String },

    /// The credentials file is not valid TOML of the expected shape.
    #[error("failed to parse credentials file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A required field was not provided by any source.
    #[error("no {field} configured")]
    MissingField { field: &'static str },
}

/// The arguments a profile is resolved from.
///
/// Queries are compared and hashed field by field: the session registry uses
/// them as keys, so two queries share a session only when every field is
/// equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProfileQuery {
    /// Explicit credentials file location.
    pub credentials_path: Option<PathBuf>,

    /// Table to read from the credentials file.
    pub profile_name: Option<String>,

    /// Explicit platform domain.
    pub domain: Option<String>,

    /// Explicit URL scheme.
    pub protocol: Option<String>,

    /// Explicit client ID.
    pub client_id: Option<String>,

    /// Explicit client secret.
    pub client_secret: Option<Secret>,
}

impl ProfileQuery {
    /// An empty query: everything comes from the environment, the credentials
    /// file or the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read credentials from `path`.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Select a named table of the credentials file.
    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    /// Set the platform domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the URL scheme.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(Secret::new(client_secret));
        self
    }
}

/// Turns a [`ProfileQuery`] into a [`Profile`].
pub trait ProfileResolver: Send + Sync {
    /// Resolve the profile described by `query`.
    fn resolve(&self, query: &ProfileQuery) -> Result<Profile, ConfigError>;
}

/// One table of the credentials file.
#[derive(Default, Deserialize)]
#[serde(default)]
struct FileProfile {
    domain: Option<String>,
    protocol: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

/// Resolver reading the query, environment variables and credentials file.
///
/// The environment is captured when the resolver is built, so later changes
/// to the process environment are not observed.
#[derive(Clone)]
pub struct DefaultProfileResolver {
    env: HashMap<String, String>,
    default_credentials_path: Option<PathBuf>,
}

impl DefaultProfileResolver {
    /// Create a resolver over the current process environment.
    pub fn from_env() -> Self {
        Self::with_env(std::env::vars().collect())
    }

    /// Create a resolver over an explicit set of environment variables.
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            env,
            default_credentials_path: default_credentials_path(),
        }
    }

    /// Replace the credentials file location used when neither the query nor
    /// the environment names one. `None` disables the file source.
    pub fn with_default_credentials_path(mut self, path: Option<PathBuf>) -> Self {
        self.default_credentials_path = path;
        self
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn credentials_path(&self, query: &ProfileQuery) -> Option<PathBuf> {
        query
            .credentials_path
            .clone()
            .or_else(|| self.env_var(ENV_CREDENTIALS_PATH).map(PathBuf::from))
            .or_else(|| self.default_credentials_path.clone())
    }
}

impl std::fmt::Debug for DefaultProfileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultProfileResolver")
            .field("env_vars", &self.env.len())
            .field("default_credentials_path", &self.default_credentials_path)
            .finish()
    }
}

impl Default for DefaultProfileResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ProfileResolver for DefaultProfileResolver {
    fn resolve(&self, query: &ProfileQuery) -> Result<Profile, ConfigError> {
        let profile_name = query
            .profile_name
            .clone()
            .or_else(|| self.env_var(ENV_PROFILE))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let file = match self.credentials_path(query) {
            Some(path) => load_file_profile(&path, &profile_name)?,
            None => FileProfile::default(),
        };

        let domain = query
            .domain
            .clone()
            .or_else(|| self.env_var(ENV_DOMAIN))
            .or(file.domain)
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());

        let protocol = query
            .protocol
            .clone()
            .or_else(|| self.env_var(ENV_PROTOCOL))
            .or(file.protocol)
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());

        let client_id = query
            .client_id
            .clone()
            .or_else(|| self.env_var(ENV_CLIENT_ID))
            .or(file.client_id)
            .ok_or(ConfigError::MissingField { field: "client_id" })?;

        let client_secret = query
            .client_secret
            .as_ref()
            .map(|s| s.expose().to_string())
            .or_else(|| self.env_var(ENV_CLIENT_SECRET))
            .or(file.client_secret)
            .ok_or(ConfigError::MissingField {
                field: "client_secret",
            })?;

        let profile = Profile::new(domain, protocol, client_id, client_secret);
        tracing::debug!("Resolved profile {} ({})", profile_name, profile);
        Ok(profile)
    }
}

/// Default credentials file location.
pub fn default_credentials_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "faculty")
        .map(|dirs| dirs.config_dir().join("credentials.toml"))
}

fn load_file_profile(path: &Path, profile_name: &str) -> Result<FileProfile, ConfigError> {
    if !path.exists() {
        tracing::debug!("No credentials file at {:?}", path);
        return Ok(FileProfile::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::CredentialsFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut profiles: HashMap<String, FileProfile> =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match profiles.remove(profile_name) {
        Some(profile) => Ok(profile),
        None => {
            tracing::debug!("Profile {} not present in {:?}", profile_name, path);
            Ok(FileProfile::default())
        }
    }
}
