//! Access token caching.
//!
//! This module provides:
//! - [`AccessTokenCache`] - Trait for access token cache backends
//! - [`MemoryAccessTokenCache`] - In-memory implementation
//!
//! Caches are keyed by [`Profile`] value. A cache never hands out an expired
//! token: expiry is checked on every read, and an expired entry reads as a
//! miss.

use crate::model::Profile;
use crate::token::AccessToken;

mod memory;

pub use memory::MemoryAccessTokenCache;

/// Abstraction over access token cache backends.
///
/// Misses (absent or expired entries) are `None`, never errors.
pub trait AccessTokenCache: Send + Sync {
    /// Retrieve the token cached for `profile`, if it is still valid.
    fn get(&self, profile: &Profile) -> Option<AccessToken>;

    /// Store a token for `profile`.
    ///
    /// Overwrites any existing entry for an equal profile.
    fn add(&self, profile: &Profile, token: AccessToken);
}
