//! Dataset helpers.
//!
//! Dataset objects live in a per-project namespace addressed by POSIX-style
//! paths rooted at `/`. See [`path`] for the path algebra.

pub mod path;

pub use path::PathError;
