//! # Faculty Core
//!
//! Client library for the Faculty platform.
//!
//! This crate provides:
//! - Profiles and their resolution from arguments, environment and credentials file
//! - Access token issuance and caching
//! - Sessions, shared per profile query through a [`SessionRegistry`]
//! - Project path utilities for datasets
//! - Typed REST clients built on sessions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faculty_core::{EnvironmentClient, FacultyError, ProfileQuery, SessionRegistry};
//!
//! async fn list_environments(project_id: uuid::Uuid) -> Result<(), FacultyError> {
//!     let registry = SessionRegistry::from_env();
//!     let session = registry.get(&ProfileQuery::new(), None)?;
//!     let client = EnvironmentClient::new(session)?;
//!     for environment in client.list(project_id).await? {
//!         println!("{}", environment.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clients;
pub mod config;
pub mod datasets;
pub mod error;
pub mod issuer;
pub mod model;
pub mod session;
pub mod token;

// Re-export commonly used types at crate root
pub use model::{Profile, Secret};

pub use token::{AccessToken, AuthError, TokenIssuer};

pub use issuer::HttpTokenIssuer;

pub use cache::{AccessTokenCache, MemoryAccessTokenCache};

pub use config::{ConfigError, DefaultProfileResolver, ProfileQuery, ProfileResolver};

pub use session::{Session, SessionRegistry};

pub use datasets::PathError;

pub use clients::{BaseClient, ClientError, Environment, EnvironmentClient};

pub use error::FacultyError;
