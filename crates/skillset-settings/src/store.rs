//! Settings documents on disk
//!
//! Read-modify-write with no locking: two processes merging into the same
//! file race, and the last writer's document wins.

use skillset_types::{Result, SkillsetError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::merge::deep_merge;

/// Repository-root filenames holding permissions, in priority order
pub const REPO_PERMISSION_FILES: [&str; 3] =
    ["settings.json", "permissions.json", "claude-settings.json"];

/// A settings document persisted at a path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the document; an absent file reads as the empty mapping
    pub fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            debug!("No settings at {:?}, starting empty", self.path);
            return Ok(Document::empty());
        }
        read_document(&self.path)
    }

    /// Write the document, creating parent directories as needed
    pub fn save(&self, doc: &Document) -> Result<()> {
        write_document(&self.path, doc)
    }

    /// Deep merge `overlay` over the stored document and save the result
    pub fn merge(&self, overlay: Document) -> Result<Document> {
        let merged = deep_merge(self.load()?, overlay);
        self.save(&merged)?;
        info!("Merged settings into {:?}", self.path);
        Ok(merged)
    }
}

/// Parse a JSON document from `path`
pub fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).map_err(|e| SkillsetError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| SkillsetError::parse(path, e))
}

/// Write `doc` as 2-space indented JSON with a trailing newline
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SkillsetError::io(parent, e))?;
    }
    let mut text = serde_json::to_string_pretty(doc).map_err(|e| SkillsetError::io(path, e.into()))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| SkillsetError::io(path, e))
}

/// Load the first permission file found at the root of a repository
pub fn find_repo_permissions(repo_dir: &Path) -> Result<Option<Document>> {
    for name in REPO_PERMISSION_FILES {
        let path = repo_dir.join(name);
        if path.is_file() {
            debug!("Using repository permissions from {:?}", path);
            return read_document(&path).map(Some);
        }
    }
    Ok(None)
}

/// Merge a repository's permission file into `store`.
///
/// Returns the repository document's top-level keys, or nothing (and no
/// write) when the repository carries no permission file. A file that is
/// not a non-empty mapping counts as no permissions.
pub fn merge_repo_permissions(repo_dir: &Path, store: &SettingsStore) -> Result<Vec<String>> {
    let Some(repo_doc) = find_repo_permissions(repo_dir)? else {
        return Ok(Vec::new());
    };
    if repo_doc.as_mapping().is_none() || repo_doc.is_empty_mapping() {
        warn!("Ignoring repository permissions in {:?}: not a non-empty object", repo_dir);
        return Ok(Vec::new());
    }
    let keys = repo_doc.keys();
    store.merge(repo_doc)?;
    Ok(keys)
}
