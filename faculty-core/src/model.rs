//! Domain model types for the Faculty SDK.
//!
//! This module defines the value types shared by the rest of the crate:
//! - [`Secret`] - A wrapper for sensitive values that prevents accidental logging
//! - [`Profile`] - Resolved connection and credential configuration for one account

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret value that prevents accidental exposure in logs.
///
/// The inner value is only accessible via [`expose()`](Secret::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the value,
/// and the backing memory is zeroed when the secret is dropped.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Secret {}

impl Hash for Secret {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Connection and credential configuration for one platform account.
///
/// Profiles are immutable values compared and hashed field by field, which
/// lets them key the access token cache directly.
///
/// # Examples
///
/// ```
/// use faculty_core::Profile;
///
/// let profile = Profile::new("test.domain.com", "https", "client-id", "client-secret");
/// assert_eq!(profile.domain, "test.domain.com");
/// assert_eq!(profile.client_secret.expose(), "client-secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    /// Platform domain, e.g. `services.cloud.my.faculty.ai`.
    pub domain: String,

    /// URL scheme used to reach platform services (usually `https`).
    pub protocol: String,

    /// OAuth client ID used for the client-credentials grant.
    pub client_id: String,

    /// OAuth client secret used for the client-credentials grant.
    pub client_secret: Secret,
}

impl Profile {
    /// Create a new profile.
    pub fn new(
        domain: impl Into<String>,
        protocol: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            protocol: protocol.into(),
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
        }
    }

    /// Base URL of a platform service, e.g. `https://hudson.example.com`.
    pub fn service_base(&self, service: &str) -> String {
        format!("{}://{}.{}", self.protocol, service, self.domain)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}://{}", self.client_id, self.protocol, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = Secret::new("super-secret");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_secret_display_redacted() {
        let secret = Secret::new("super-secret");
        let display = format!("{}", secret);
        assert!(!display.contains("super-secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_profile_debug_hides_client_secret() {
        let profile = Profile::new("test.domain.com", "https", "id", "very-secret");
        let debug = format!("{:?}", profile);
        assert!(debug.contains("test.domain.com"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_profile_hash_by_value() {
        let a = Profile::new("test.domain.com", "https", "id", "secret");
        let b = Profile::new("test.domain.com", "https", "id", "secret");
        let c = Profile::new("test.domain.com", "https", "id", "other-secret");

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_profile_service_base() {
        let profile = Profile::new("test.domain.com", "https", "id", "secret");
        assert_eq!(profile.service_base("hudson"), "https://hudson.test.domain.com");
    }
}
