//! In-memory access token cache.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::AccessTokenCache;
use crate::model::Profile;
use crate::token::AccessToken;

/// In-memory access token cache.
///
/// This cache is not persistent; tokens are lost when the process exits.
/// Expired entries are left in place and simply read as misses.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is
/// safe to share across threads.
pub struct MemoryAccessTokenCache {
    tokens: RwLock<HashMap<Profile, AccessToken>>,
}

impl MemoryAccessTokenCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the token for `profile` as of `now`.
    pub fn get_at(&self, profile: &Profile, now: DateTime<Utc>) -> Option<AccessToken> {
        let tokens = self.tokens.read();
        match tokens.get(profile) {
            Some(token) if token.is_valid_at(now) => Some(token.clone()),
            Some(_) => {
                tracing::debug!("Cached access token for {} has expired", profile);
                None
            }
            None => None,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl Default for MemoryAccessTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryAccessTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAccessTokenCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl AccessTokenCache for MemoryAccessTokenCache {
    fn get(&self, profile: &Profile) -> Option<AccessToken> {
        self.get_at(profile, Utc::now())
    }

    fn add(&self, profile: &Profile, token: AccessToken) {
        self.tokens.write().insert(profile.clone(), token);
    }
}
