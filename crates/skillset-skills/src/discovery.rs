//! Skill discovery
//!
//! Walks a repository root depth-first, one directory level at a time in
//! lexicographic order, and collects every directory that qualifies as a
//! skill. Paths with a dot-prefixed segment below the root are never entered.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::skill::{Skill, MANIFEST_FILE};

/// Rule deciding whether a directory is a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionRule {
    /// Directory directly contains `SKILL.md`
    #[default]
    Manifest,
    /// Legacy: directory directly contains any `*.md` file, except the
    /// repository's own top-level README
    Markdown,
}

impl DetectionRule {
    /// Discover skills under `root` using this rule
    pub fn discover(self, root: &Path) -> Vec<Skill> {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() || !self.marks_skill(&entry) {
                continue;
            }

            let Some(dir) = entry.path().parent() else {
                continue;
            };
            if !seen.insert(dir.to_path_buf()) {
                continue;
            }

            if let Some(skill) = Skill::from_dir(dir) {
                debug!("Discovered skill: {} at {:?}", skill.name, skill.path);
                skills.push(skill);
            }
        }

        skills
    }

    fn marks_skill(self, entry: &DirEntry) -> bool {
        let file_name = entry.file_name().to_string_lossy();
        match self {
            DetectionRule::Manifest => file_name == MANIFEST_FILE,
            DetectionRule::Markdown => {
                let is_markdown = Path::new(&*file_name)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
                let is_root_readme =
                    entry.depth() == 1 && file_name.eq_ignore_ascii_case("README.md");
                is_markdown && !is_root_readme
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Discover skills under `root` with the manifest rule
pub fn discover(root: &Path) -> Vec<Skill> {
    DetectionRule::Manifest.discover(root)
}
