//! Skill definition and front matter parsing
//!
//! A skill is a directory. Its manifest may open with YAML front matter
//! carrying a name and a description; that metadata is read on demand only.

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Well-known manifest filename marking a directory as a skill
pub const MANIFEST_FILE: &str = "SKILL.md";

/// Skill metadata extracted from YAML front matter
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillMetadata {
    /// Declared skill name
    pub name: String,
    /// What the skill does and when to use it
    #[serde(default)]
    pub description: String,
}

/// A discovered skill directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    /// Name of the containing directory, used as the link name
    pub name: String,
    /// Source directory inside the repository
    pub path: PathBuf,
}

impl Skill {
    /// Build a skill from its directory; `None` when the path has no final component
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            name,
            path: dir.to_path_buf(),
        })
    }

    /// Read front matter from the skill's manifest.
    ///
    /// Missing manifests and malformed front matter are not errors, the
    /// skill simply has no metadata.
    pub fn metadata(&self) -> Option<SkillMetadata> {
        read_metadata(&self.path)
    }
}

/// Read front matter from `dir/SKILL.md`
pub fn read_metadata(dir: &Path) -> Option<SkillMetadata> {
    let manifest = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest).ok()?;

    match parse_front_matter(&content) {
        Some(metadata) => Some(metadata),
        None => {
            debug!("No usable front matter in {:?}", manifest);
            None
        }
    }
}

/// Extract metadata from `---` delimited YAML front matter
fn parse_front_matter(content: &str) -> Option<SkillMetadata> {
    let frontmatter_re = Regex::new(r"^---\s*\r?\n([\s\S]*?)\r?\n---\s*(?:\r?\n|$)").ok()?;
    let yaml_str = frontmatter_re.captures(content)?.get(1)?.as_str();

    let metadata: SkillMetadata = serde_yaml::from_str(yaml_str).ok()?;
    if metadata.name.trim().is_empty() {
        return None;
    }
    Some(metadata)
}
