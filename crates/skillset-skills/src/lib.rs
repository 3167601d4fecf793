//! Skillset Skills
//!
//! Finds skill directories inside a repository checkout and links them into
//! a skills directory.
//!
//! ## Architecture
//!
//! - [`discovery`]: deterministic walk of a repository root, yielding one
//!   [`Skill`] per directory that carries a manifest
//! - [`link`]: the platform capability (`create`, `is_link`, `remove`) behind
//!   the [`LinkBackend`] trait
//! - [`linker`]: idempotent re-linking of a skill set into a target directory

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod discovery;
pub mod link;
pub mod linker;
pub mod skill;

pub use discovery::{discover, DetectionRule};
pub use link::{platform_backend, LinkBackend};
pub use linker::{installed_skills, InstalledSkill, LinkReport, SkillLinker};
pub use skill::{Skill, SkillMetadata, MANIFEST_FILE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{discover, DetectionRule, LinkBackend, Skill, SkillLinker};
}
