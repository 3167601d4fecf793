//! Preset lookup: user-saved presets shadow built-ins of the same name

use skillset_types::{Result, SkillsetError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::builtins::builtin;
use crate::document::Document;
use crate::store::{read_document, write_document};

/// Where a resolved preset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSource {
    User,
    Builtin,
}

/// Saved presets directory plus the built-in table
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    dir: PathBuf,
}

impl PresetRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a preset, user-saved first. No merging between the two.
    pub fn resolve(&self, name: &str) -> Result<Document> {
        self.resolve_with_source(name).map(|(doc, _)| doc)
    }

    pub fn resolve_with_source(&self, name: &str) -> Result<(Document, PresetSource)> {
        validate_name(name)?;

        let path = self.preset_path(name);
        if path.is_file() {
            debug!("Using saved preset {:?}", path);
            return Ok((read_document(&path)?, PresetSource::User));
        }

        builtin(name)
            .map(|doc| (doc, PresetSource::Builtin))
            .ok_or_else(|| SkillsetError::not_found("Preset", name))
    }

    /// Persist `doc` as preset `name`, replacing any previous one
    pub fn save(&self, name: &str, doc: &Document) -> Result<PathBuf> {
        validate_name(name)?;
        let path = self.preset_path(name);
        write_document(&path, doc)?;
        info!("Saved preset '{}' to {:?}", name, path);
        Ok(path)
    }

    /// Names of saved presets, sorted
    pub fn saved(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| SkillsetError::io(&self.dir, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SkillsetError::io(&self.dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(SkillsetError::Validation(format!(
            "Invalid preset name '{}'",
            name
        )));
    }
    Ok(())
}
