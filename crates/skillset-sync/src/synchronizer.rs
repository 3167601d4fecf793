//! Clone-or-pull against the repository cache

use skillset_types::{RepoSpec, Result, SkillsetError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::{CommandFailure, VcsClient};
use crate::transport::{Transport, DEFAULT_HOST};

/// Keeps cached working copies up to date
pub struct RepoSynchronizer {
    cache_dir: PathBuf,
    host: String,
    client: Box<dyn VcsClient>,
}

impl RepoSynchronizer {
    /// Synchronizer over `cache_dir` using `client`
    pub fn new(cache_dir: impl Into<PathBuf>, client: Box<dyn VcsClient>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            host: DEFAULT_HOST.to_string(),
            client,
        }
    }

    /// Fetch from `host` instead of the default
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Working copy location of `spec`
    #[must_use]
    pub fn repo_dir(&self, spec: &RepoSpec) -> PathBuf {
        self.cache_dir.join(&spec.owner).join(&spec.name)
    }

    /// Whether a working copy of `spec` exists
    #[must_use]
    pub fn is_installed(&self, spec: &RepoSpec) -> bool {
        self.repo_dir(spec).is_dir()
    }

    /// Clone `spec` if absent, pull it otherwise. Returns the working copy.
    ///
    /// # Errors
    /// `Io` if the cache directory cannot be created, `Sync` if the client
    /// fails (after the SSH fallback, for clones).
    pub fn sync(&self, spec: &RepoSpec) -> Result<PathBuf> {
        let repo_dir = self.repo_dir(spec);

        if repo_dir.exists() {
            info!("Updating {}...", spec);
            self.client
                .pull(&repo_dir)
                .map_err(|failure| sync_error(spec, &failure))?;
            return Ok(repo_dir);
        }

        info!("Cloning {}...", spec);
        if let Some(parent) = repo_dir.parent() {
            fs::create_dir_all(parent).map_err(|e| SkillsetError::io(parent, e))?;
        }

        let https_url = Transport::Https.url(&self.host, spec);
        match self.client.clone_repo(&https_url, &repo_dir) {
            Ok(()) => {}
            Err(failure) if failure.is_auth_failure() => {
                warn!("HTTPS clone of {} failed ({}), trying SSH", spec, failure);
                let ssh_url = Transport::Ssh.url(&self.host, spec);
                self.client
                    .clone_repo(&ssh_url, &repo_dir)
                    .map_err(|failure| sync_error(spec, &failure))?;
            }
            Err(failure) => return Err(sync_error(spec, &failure)),
        }

        Ok(repo_dir)
    }

    /// Cached repositories, sorted
    ///
    /// # Errors
    /// `Io` if the cache cannot be read.
    pub fn installed(&self) -> Result<Vec<RepoSpec>> {
        let mut specs = Vec::new();
        for owner in subdirectories(&self.cache_dir)? {
            for name in subdirectories(&self.cache_dir.join(&owner))? {
                specs.push(RepoSpec::new(owner.clone(), name));
            }
        }
        specs.sort();
        Ok(specs)
    }
}

fn sync_error(spec: &RepoSpec, failure: &CommandFailure) -> SkillsetError {
    SkillsetError::Sync {
        repo: spec.to_string(),
        details: failure.to_string(),
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SkillsetError::io(dir, e))? {
        let entry = entry.map_err(|e| SkillsetError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() && !name.starts_with('.') {
            names.push(name);
        }
    }
    Ok(names)
}
