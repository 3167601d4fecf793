//! Remote URL schemes

use skillset_types::RepoSpec;

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "github.com";

/// How a repository is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `https://<host>/<owner>/<repo>.git`
    Https,
    /// `git@<host>:<owner>/<repo>.git`
    Ssh,
}

impl Transport {
    /// Clone URL of `spec` on `host`
    #[must_use]
    pub fn url(self, host: &str, spec: &RepoSpec) -> String {
        match self {
            Transport::Https => format!("https://{host}/{}/{}.git", spec.owner, spec.name),
            Transport::Ssh => format!("git@{host}:{}/{}.git", spec.owner, spec.name),
        }
    }
}
