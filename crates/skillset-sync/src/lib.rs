//! Skillset repository synchronization
//!
//! Keeps a local working copy of each remote repository in a cache rooted
//! at a caller-supplied directory, laid out as `<owner>/<repo>`.
//!
//! ## Features
//!
//! - Clone on first reference, pull on every later one
//! - Single fallback from HTTPS to SSH when the clone looks like an auth failure
//! - Version-control client behind the [`VcsClient`] trait

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod client;
pub mod synchronizer;
pub mod transport;

pub use client::{CommandFailure, GitClient, VcsClient};
pub use synchronizer::RepoSynchronizer;
pub use transport::{Transport, DEFAULT_HOST};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{GitClient, RepoSynchronizer, VcsClient};
}
