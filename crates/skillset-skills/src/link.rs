//! Directory links
//!
//! Symbolic links on Unix, junctions on Windows (no elevated rights
//! needed). Callers only see the [`LinkBackend`] capability.

use skillset_types::{Result, SkillsetError};
use std::fs;
use std::io;
use std::path::Path;

/// Platform capability for directory-level indirections
pub trait LinkBackend: Send + Sync {
    /// Create `link` resolving to `target`. Fails if anything occupies `link`.
    fn create(&self, link: &Path, target: &Path) -> Result<()>;

    /// True iff `path` is an indirection, as opposed to a plain file or directory
    fn is_link(&self, path: &Path) -> bool;

    /// Remove the indirection at `path`, leaving its target alone.
    /// Fails if `path` is not a link.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// True if any entry, including a dangling link, exists at `path`
pub fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn ensure_vacant(link: &Path) -> Result<()> {
    if occupied(link) {
        return Err(SkillsetError::io(
            link,
            io::Error::new(io::ErrorKind::AlreadyExists, "path is already occupied"),
        ));
    }
    Ok(())
}

fn not_a_link(path: &Path) -> SkillsetError {
    SkillsetError::io(
        path,
        io::Error::new(io::ErrorKind::InvalidInput, "not a symlink or junction"),
    )
}

/// Native symbolic links
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkBackend;

#[cfg(unix)]
impl LinkBackend for SymlinkBackend {
    fn create(&self, link: &Path, target: &Path) -> Result<()> {
        ensure_vacant(link)?;
        std::os::unix::fs::symlink(target, link).map_err(|e| SkillsetError::io(link, e))
    }

    fn is_link(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if !self.is_link(path) {
            return Err(not_a_link(path));
        }
        fs::remove_file(path).map_err(|e| SkillsetError::io(path, e))
    }
}

/// Directory junctions, created through `mklink /J`
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct JunctionBackend;

#[cfg(windows)]
const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;

#[cfg(windows)]
impl LinkBackend for JunctionBackend {
    fn create(&self, link: &Path, target: &Path) -> Result<()> {
        ensure_vacant(link)?;
        let output = std::process::Command::new("cmd")
            .args(["/c", "mklink", "/J"])
            .arg(link)
            .arg(target)
            .output()
            .map_err(|e| SkillsetError::io(link, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SkillsetError::io(
                link,
                io::Error::other(format!("mklink failed: {}", stderr.trim())),
            ));
        }
        Ok(())
    }

    fn is_link(&self, path: &Path) -> bool {
        use std::os::windows::fs::MetadataExt;

        fs::symlink_metadata(path)
            .map(|meta| {
                meta.file_type().is_symlink()
                    || meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
            })
            .unwrap_or(false)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if !self.is_link(path) {
            return Err(not_a_link(path));
        }
        // Junctions are directories to the OS; unlinking them fails.
        let removed = if path.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| SkillsetError::io(path, e))
    }
}

/// Backend for the platform this binary runs on
#[cfg(unix)]
pub fn platform_backend() -> Box<dyn LinkBackend> {
    Box::new(SymlinkBackend)
}

/// Backend for the platform this binary runs on
#[cfg(windows)]
pub fn platform_backend() -> Box<dyn LinkBackend> {
    Box::new(JunctionBackend)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_and_detect_link() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("source");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");

        let backend = platform_backend();
        backend.create(&link, &target).unwrap();

        assert!(backend.is_link(&link));
        assert!(!backend.is_link(&target));
        assert_eq!(fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn test_create_refuses_occupied_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("source");
        let link = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::create_dir(&link).unwrap();

        let err = SymlinkBackend.create(&link, &target).unwrap_err();
        assert!(matches!(err, SkillsetError::Io { .. }));
        assert!(link.is_dir());
    }

    #[test]
    fn test_remove_keeps_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("source");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("SKILL.md"), "# skill").unwrap();
        let link = dir.path().join("link");

        SymlinkBackend.create(&link, &target).unwrap();
        SymlinkBackend.remove(&link).unwrap();

        assert!(!occupied(&link));
        assert!(target.join("SKILL.md").exists());
    }

    #[test]
    fn test_remove_rejects_plain_directory() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain");
        fs::create_dir(&plain).unwrap();

        let err = SymlinkBackend.remove(&plain).unwrap_err();
        assert!(matches!(err, SkillsetError::Io { .. }));
        assert!(plain.is_dir());
    }

    #[test]
    fn test_dangling_link_is_still_a_link() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling");
        SymlinkBackend
            .create(&link, &dir.path().join("moved-away"))
            .unwrap();

        assert!(!link.exists());
        assert!(occupied(&link));
        assert!(SymlinkBackend.is_link(&link));
    }
}
