//! Authenticated sessions against the platform.
//!
//! This module provides:
//! - [`Session`] - A profile paired with an access token cache
//! - [`SessionRegistry`] - Hands out one shared session per [`ProfileQuery`]
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use faculty_core::{ProfileQuery, SessionRegistry};
//!
//! let registry = SessionRegistry::from_env();
//! let session = registry.get(&ProfileQuery::new(), None)?;
//!
//! let token = session.access_token().await?;
//! let url = session.service_url("baskerville", "project");
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{AccessTokenCache, MemoryAccessTokenCache};
use crate::config::{ConfigError, DefaultProfileResolver, ProfileQuery, ProfileResolver};
use crate::issuer::HttpTokenIssuer;
use crate::model::Profile;
use crate::token::{AccessToken, AuthError, TokenIssuer};

/// A profile together with the cache its access tokens are kept in.
///
/// The session never stores tokens itself; it reads and populates the
/// cache it was built with, and asks its issuer for a new token on a miss.
pub struct Session {
    profile: Profile,
    access_token_cache: Arc<dyn AccessTokenCache>,
    issuer: Arc<dyn TokenIssuer>,
}

impl Session {
    /// Create a session.
    pub fn new(
        profile: Profile,
        access_token_cache: Arc<dyn AccessTokenCache>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            profile,
            access_token_cache,
            issuer,
        }
    }

    /// The profile this session authenticates as.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The cache this session reads and populates.
    pub fn access_token_cache(&self) -> &Arc<dyn AccessTokenCache> {
        &self.access_token_cache
    }

    /// Get a valid access token, requesting a new one if necessary.
    ///
    /// A cached token that has not expired is returned without contacting
    /// the issuer. Otherwise a new token is issued, added to the cache and
    /// returned. Issuance errors are returned unchanged.
    pub async fn access_token(&self) -> Result<AccessToken, AuthError> {
        if let Some(token) = self.access_token_cache.get(&self.profile) {
            tracing::debug!("Using cached access token for {}", self.profile);
            return Ok(token);
        }

        tracing::debug!("No valid cached access token for {}", self.profile);
        let token = self.issuer.issue(&self.profile).await?;
        self.access_token_cache.add(&self.profile, token.clone());
        Ok(token)
    }

    /// Build the URL of `endpoint` on platform service `service_name`.
    ///
    /// Produces `{protocol}://{service_name}.{domain}/{endpoint}`, or the bare
    /// service URL when `endpoint` is empty. All leading slashes are stripped
    /// from `endpoint`, so `"/x"` and `"//x"` both resolve to `.../x`.
    pub fn service_url(&self, service_name: &str, endpoint: &str) -> String {
        let base = self.profile.service_base(service_name);
        let endpoint = endpoint.trim_start_matches('/');
        if endpoint.is_empty() {
            base
        } else {
            format!("{}/{}", base, endpoint)
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// Registry of sessions keyed by the query their profile was resolved from.
///
/// Repeated calls to [`get`](SessionRegistry::get) with an equal query
/// return the same `Arc<Session>`. The registry is an ordinary value: the
/// application creates one and passes it to whatever needs sessions.
///
/// # Thread Safety
///
/// Lookup, profile resolution and insertion happen under a single mutex, so
/// concurrent callers with the same query always observe one session.
pub struct SessionRegistry {
    resolver: Arc<dyn ProfileResolver>,
    issuer: Arc<dyn TokenIssuer>,
    sessions: Mutex<HashMap<ProfileQuery, Arc<Session>>>,
}

impl SessionRegistry {
    /// Create a registry resolving profiles with `resolver` and issuing
    /// tokens with `issuer`.
    pub fn new(
        resolver: impl ProfileResolver + 'static,
        issuer: impl TokenIssuer + 'static,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            issuer: Arc::new(issuer),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry over the process environment and the platform's
    /// HTTP token endpoint.
    pub fn from_env() -> Self {
        Self::new(DefaultProfileResolver::from_env(), HttpTokenIssuer::new())
    }

    /// Get the session for `query`, creating it on first use.
    ///
    /// A new session uses `access_token_cache` if given, otherwise a fresh
    /// [`MemoryAccessTokenCache`]. When a session already exists for an
    /// equal query it is returned as is and `access_token_cache` is ignored;
    /// the profile is not resolved again either.
    pub fn get(
        &self,
        query: &ProfileQuery,
        access_token_cache: Option<Arc<dyn AccessTokenCache>>,
    ) -> Result<Arc<Session>, ConfigError> {
        let mut sessions = self.sessions.lock();

        if let Some(session) = sessions.get(query) {
            if access_token_cache.is_some() {
                tracing::debug!(
                    "Reusing session for {}; supplied access token cache ignored",
                    session.profile
                );
            }
            return Ok(Arc::clone(session));
        }

        let profile = self.resolver.resolve(query)?;
        let cache = access_token_cache
            .unwrap_or_else(|| Arc::new(MemoryAccessTokenCache::new()) as Arc<dyn AccessTokenCache>);

        tracing::debug!("Creating session for {}", profile);
        let session = Arc::new(Session::new(profile, cache, Arc::clone(&self.issuer)));
        sessions.insert(query.clone(), Arc::clone(&session));
        Ok(session)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Check if no session has been created yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.len())
            .finish_non_exhaustive()
    }
}
