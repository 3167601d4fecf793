use crate::{Result, SkillsetError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote repository specifier in `owner/repo` form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
}

impl RepoSpec {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/repo`. Anything other than two plain, non-empty segments is rejected.
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if is_segment(owner) && is_segment(name) => Ok(Self::new(*owner, *name)),
            _ => Err(SkillsetError::Validation(format!(
                "Invalid repo format: {}. Use 'owner/repo'",
                spec
            ))),
        }
    }
}

// Owner and name become cache path components
fn is_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
