//! Version-control client seam
//!
//! The real client shells out to `git` and blocks until it exits.

use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Failed client invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Exit status, `None` if the process could not be started or was killed
    pub status: Option<i32>,
    /// Captured diagnostic output
    pub output: String,
}

impl CommandFailure {
    /// Whether retrying over the fallback transport may help
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.output.contains("Authentication failed") || self.status == Some(128)
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "exit status {code}: {}", self.output.trim()),
            None => write!(f, "{}", self.output.trim()),
        }
    }
}

/// Opaque version-control operations
pub trait VcsClient: Send + Sync {
    /// Clone `url` into `dest`
    ///
    /// # Errors
    /// Returns the client's exit status and output on failure.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CommandFailure>;

    /// Integrate the latest remote state into the working copy at `repo_dir`
    ///
    /// # Errors
    /// Returns the client's exit status and output on failure.
    fn pull(&self, repo_dir: &Path) -> Result<(), CommandFailure>;
}

/// `git` on the `PATH`
#[derive(Debug, Clone)]
pub struct GitClient {
    program: String,
}

impl GitClient {
    /// Client running the `git` executable
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Client running a specific executable
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, command: &mut Command) -> Result<(), CommandFailure> {
        debug!("Running {:?}", command);
        let output = command.output().map_err(|e| CommandFailure {
            status: None,
            output: format!("failed to run {}: {e}", self.program),
        })?;

        if output.status.success() {
            return Ok(());
        }

        let mut diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
        if diagnostic.trim().is_empty() {
            diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
        }
        Err(CommandFailure {
            status: output.status.code(),
            output: diagnostic,
        })
    }
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsClient for GitClient {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CommandFailure> {
        self.run(Command::new(&self.program).arg("clone").arg(url).arg(dest))
    }

    fn pull(&self, repo_dir: &Path) -> Result<(), CommandFailure> {
        self.run(Command::new(&self.program).arg("pull").current_dir(repo_dir))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_detection() {
        let by_status = CommandFailure {
            status: Some(128),
            output: "fatal: could not read Username".into(),
        };
        let by_text = CommandFailure {
            status: Some(1),
            output: "remote: Authentication failed for 'https://...'".into(),
        };
        let other = CommandFailure {
            status: Some(1),
            output: "fatal: destination path exists".into(),
        };

        assert!(by_status.is_auth_failure());
        assert!(by_text.is_auth_failure());
        assert!(!other.is_auth_failure());
    }

    #[test]
    fn test_missing_program_is_reported() {
        let client = GitClient::with_program("skillset-no-such-vcs");
        let dir = tempfile::tempdir().unwrap();

        let failure = client.pull(dir.path()).unwrap_err();
        assert_eq!(failure.status, None);
        assert!(failure.to_string().contains("skillset-no-such-vcs"));
    }
}
