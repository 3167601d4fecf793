//! Skillset Types - Core types shared across the skillset crates
//!
//! Holds the error type, the repository specifier and the [`Locations`]
//! value object. Nothing in here touches the filesystem.

mod error;
mod repo;

pub use error::{Result, SkillsetError};
pub use repo::RepoSpec;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every filesystem location the core operates on.
///
/// Built once by the caller and handed to the components; the core never
/// derives home or working directories itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locations {
    /// Root of the repository cache (`<owner>/<repo>` underneath)
    pub cache_dir: PathBuf,
    /// Directory holding one `<name>.json` per saved preset
    pub presets_dir: PathBuf,
    /// Skills directory shared by all projects
    pub global_skills_dir: PathBuf,
    /// Skills directory of the current project
    pub project_skills_dir: PathBuf,
    /// Settings document of the current project
    pub project_settings: PathBuf,
    /// Project directory used for preset auto-detection
    pub project_dir: PathBuf,
}

impl Locations {
    /// Skills directory for the given scope
    pub fn skills_dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Global => &self.global_skills_dir,
            Scope::Project => &self.project_skills_dir,
        }
    }
}

/// Where skills get linked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    Global,
    #[default]
    Project,
}

impl Scope {
    pub fn from_global_flag(global: bool) -> Self {
        if global {
            Scope::Global
        } else {
            Scope::Project
        }
    }
}
