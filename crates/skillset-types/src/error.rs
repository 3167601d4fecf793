//! Error types shared by every skillset crate

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Skillset errors
#[derive(Debug, Error)]
pub enum SkillsetError {
    /// A stored document is not valid JSON
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Version-control client failed after the fallback transport
    #[error("Failed to sync '{repo}': {details}")]
    Sync {
        /// Repository in `owner/repo` form
        repo: String,
        /// Diagnostic output of the client
        details: String,
    },

    /// Requested preset, skill or repository does not exist
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was looked up (e.g. "Preset")
        kind: &'static str,
        /// Name that was looked up
        name: String,
    },

    /// Malformed user input
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl SkillsetError {
    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a JSON error with the file it came from
    pub fn parse(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Shorthand for [`SkillsetError::NotFound`]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// True for [`SkillsetError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillsetError>;
