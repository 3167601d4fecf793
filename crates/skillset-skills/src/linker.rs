//! Linking a set of skills into a skills directory
//!
//! Re-linking is idempotent: links this tool created are dropped and
//! recreated, so a moved source directory is picked up. Anything that is
//! not a link is user data and is never overwritten.

use skillset_types::{Result, SkillsetError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::link::{occupied, platform_backend, LinkBackend};
use crate::skill::Skill;

/// Outcome of [`SkillLinker::link_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Skills whose link now points at their source directory
    pub linked: Vec<String>,
    /// Skills left alone because a non-link entry holds their name
    pub skipped: Vec<String>,
}

/// Entry found in a skills directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledSkill {
    /// Entry name
    pub name: String,
    /// Where the entry points, if it is a link
    pub link_target: Option<PathBuf>,
}

/// Keeps a skills directory in step with discovered skill sources
pub struct SkillLinker {
    backend: Box<dyn LinkBackend>,
}

impl SkillLinker {
    /// Create a linker over an explicit backend
    pub fn new(backend: Box<dyn LinkBackend>) -> Self {
        Self { backend }
    }

    /// Create a linker for the current platform
    pub fn platform() -> Self {
        Self::new(platform_backend())
    }

    /// The link capability in use
    pub fn backend(&self) -> &dyn LinkBackend {
        self.backend.as_ref()
    }

    /// Make `target_dir/<skill name>` resolve to each skill's source directory.
    ///
    /// Creates `target_dir` if needed. Sources are linked by absolute path, so
    /// skills discovered under a relative root still resolve. When two skills
    /// share a name the later one wins.
    pub fn link_all(&self, skills: &[Skill], target_dir: &Path) -> Result<LinkReport> {
        fs::create_dir_all(target_dir).map_err(|e| SkillsetError::io(target_dir, e))?;

        let mut report = LinkReport::default();
        for skill in skills {
            let link_path = target_dir.join(&skill.name);
            let source =
                std::path::absolute(&skill.path).map_err(|e| SkillsetError::io(&skill.path, e))?;

            if self.backend.is_link(&link_path) {
                debug!("Refreshing link {:?}", link_path);
                self.backend.remove(&link_path)?;
            } else if occupied(&link_path) {
                warn!(
                    "Skipping {}: {:?} already exists (not a link)",
                    skill.name, link_path
                );
                report.skipped.push(skill.name.clone());
                continue;
            }

            self.backend.create(&link_path, &source)?;
            report.linked.push(skill.name.clone());
        }

        info!(
            "Linked {} skill(s) into {:?} ({} skipped)",
            report.linked.len(),
            target_dir,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Remove the link named `name` from `target_dir`
    pub fn unlink(&self, target_dir: &Path, name: &str) -> Result<()> {
        let link_path = target_dir.join(name);
        if !occupied(&link_path) {
            return Err(SkillsetError::not_found("Skill", name));
        }
        self.backend.remove(&link_path)?;
        info!("Removed {} from {:?}", name, target_dir);
        Ok(())
    }
}

/// List a skills directory, sorted by name. A missing directory is empty.
pub fn installed_skills(backend: &dyn LinkBackend, dir: &Path) -> Result<Vec<InstalledSkill>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| SkillsetError::io(dir, e))?;
    let mut installed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SkillsetError::io(dir, e))?;
        let path = entry.path();
        let link_target = if backend.is_link(&path) {
            fs::read_link(&path).ok()
        } else {
            None
        };
        installed.push(InstalledSkill {
            name: entry.file_name().to_string_lossy().into_owned(),
            link_target,
        });
    }

    installed.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(installed)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use tempfile::TempDir;

    fn skill_repo(root: &Path, names: &[&str]) -> Vec<Skill> {
        for name in names {
            let dir = root.join("skills").join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("SKILL.md"), format!("# {name}")).unwrap();
        }
        discover(root)
    }

    fn snapshot(dir: &Path) -> Vec<(String, Option<PathBuf>)> {
        installed_skills(platform_backend().as_ref(), dir)
            .unwrap()
            .into_iter()
            .map(|s| (s.name, s.link_target))
            .collect()
    }

    #[test]
    fn test_link_all_creates_target_and_links() {
        let tmp = TempDir::new().unwrap();
        let skills = skill_repo(&tmp.path().join("repo"), &["pdf", "xlsx"]);
        let target = tmp.path().join("nested/skills");

        let report = SkillLinker::platform().link_all(&skills, &target).unwrap();

        assert_eq!(report.linked, vec!["pdf", "xlsx"]);
        assert!(report.skipped.is_empty());
        assert_eq!(fs::read_link(target.join("pdf")).unwrap(), skills[0].path);
        assert!(target.join("xlsx/SKILL.md").exists());
    }

    #[test]
    fn test_existing_plain_directory_is_protected() {
        let tmp = TempDir::new().unwrap();
        let skills = skill_repo(&tmp.path().join("repo"), &["foo", "bar"]);
        let target = tmp.path().join("skills");
        fs::create_dir_all(target.join("foo")).unwrap();
        fs::write(target.join("foo/notes.txt"), "mine").unwrap();

        let report = SkillLinker::platform().link_all(&skills, &target).unwrap();

        assert_eq!(report.linked, vec!["bar"]);
        assert_eq!(report.skipped, vec!["foo"]);
        assert!(!platform_backend().is_link(&target.join("foo")));
        assert_eq!(
            fs::read_to_string(target.join("foo/notes.txt")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_relinking_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let skills = skill_repo(&tmp.path().join("repo"), &["a", "b", "c"]);
        let target = tmp.path().join("skills");
        let linker = SkillLinker::platform();

        let first = linker.link_all(&skills, &target).unwrap();
        let after_first = snapshot(&target);
        let second = linker.link_all(&skills, &target).unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first, snapshot(&target));
    }

    #[test]
    fn test_relink_follows_moved_source() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("skills");
        let linker = SkillLinker::platform();

        let old = skill_repo(&tmp.path().join("old"), &["pdf"]);
        linker.link_all(&old, &target).unwrap();
        fs::remove_dir_all(tmp.path().join("old")).unwrap();

        let new = skill_repo(&tmp.path().join("new"), &["pdf"]);
        let report = linker.link_all(&new, &target).unwrap();

        assert_eq!(report.linked, vec!["pdf"]);
        assert_eq!(fs::read_link(target.join("pdf")).unwrap(), new[0].path);
    }

    #[test]
    fn test_relative_root_links_resolve() {
        let cwd = std::env::current_dir().unwrap();
        let tmp = TempDir::new_in(&cwd).unwrap();
        let relative = tmp.path().strip_prefix(&cwd).unwrap();
        let skills = skill_repo(&relative.join("repo"), &["pdf"]);
        assert!(skills[0].path.is_relative());
        let target = relative.join("target/skills");

        let report = SkillLinker::platform().link_all(&skills, &target).unwrap();

        assert_eq!(report.linked, vec!["pdf"]);
        assert!(fs::read_link(target.join("pdf")).unwrap().is_absolute());
        assert!(target.join("pdf/SKILL.md").exists());
    }

    #[test]
    fn test_unlink() {
        let tmp = TempDir::new().unwrap();
        let skills = skill_repo(&tmp.path().join("repo"), &["pdf"]);
        let target = tmp.path().join("skills");
        fs::create_dir_all(target.join("manual")).unwrap();
        let linker = SkillLinker::platform();
        linker.link_all(&skills, &target).unwrap();

        linker.unlink(&target, "pdf").unwrap();
        assert!(!occupied(&target.join("pdf")));
        assert!(skills[0].path.join("SKILL.md").exists());

        assert!(linker.unlink(&target, "pdf").unwrap_err().is_not_found());
        assert!(matches!(
            linker.unlink(&target, "manual").unwrap_err(),
            SkillsetError::Io { .. }
        ));
    }

    #[test]
    fn test_installed_skills_lists_links_and_plain_entries() {
        let tmp = TempDir::new().unwrap();
        let skills = skill_repo(&tmp.path().join("repo"), &["pdf"]);
        let target = tmp.path().join("skills");
        fs::create_dir_all(target.join("handmade")).unwrap();
        SkillLinker::platform().link_all(&skills, &target).unwrap();

        let listed = snapshot(&target);
        assert_eq!(
            listed,
            vec![
                ("handmade".to_string(), None),
                ("pdf".to_string(), Some(skills[0].path.clone())),
            ]
        );
        assert!(snapshot(&tmp.path().join("absent")).is_empty());
    }
}
