use crate::config::Config;
use anyhow::{Context, Result};
use skillset_settings::{
    builtin, builtin_names, deep_merge, detect_project_presets, merge_repo_permissions,
    Document, PresetRegistry, SettingsStore,
};
use skillset_skills::{
    installed_skills, DetectionRule, LinkReport, Skill, SkillLinker,
};
use skillset_sync::{GitClient, RepoSynchronizer, VcsClient};
use skillset_types::{Locations, RepoSpec, Scope, SkillsetError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of `add`
#[derive(Debug)]
pub struct AddReport {
    pub skills_dir: PathBuf,
    pub links: LinkReport,
    pub settings: PathBuf,
    pub merged_keys: Vec<String>,
}

/// Per-repository result of `update`
#[derive(Debug)]
pub struct RepoUpdate {
    pub repo: RepoSpec,
    pub links: LinkReport,
    pub merged_keys: Vec<String>,
}

/// Result of `apply`
#[derive(Debug)]
pub struct ApplyReport {
    pub presets: Vec<String>,
    pub rules: usize,
    pub settings: PathBuf,
    pub detected: bool,
    pub dry_run: bool,
}

/// Entry of a skills directory, with its description when it has one
#[derive(Debug)]
pub struct ListedSkill {
    pub name: String,
    pub link_target: Option<PathBuf>,
    pub description: Option<String>,
}

/// Result of `list`
#[derive(Debug)]
pub struct Listing {
    pub global_dir: PathBuf,
    pub global: Vec<ListedSkill>,
    pub project_dir: PathBuf,
    pub project: Vec<ListedSkill>,
    pub presets_dir: PathBuf,
    pub saved_presets: Vec<String>,
    pub builtin_presets: Vec<&'static str>,
}

/// Skillset service - composes sync, discovery, linking and settings
pub struct SkillsetService {
    locations: Locations,
    home: PathBuf,
    linker: SkillLinker,
    sync: RepoSynchronizer,
    presets: PresetRegistry,
    detection: DetectionRule,
}

impl SkillsetService {
    /// Create a service over explicit collaborators
    pub fn new(
        locations: Locations,
        home: PathBuf,
        linker: SkillLinker,
        client: Box<dyn VcsClient>,
        detection: DetectionRule,
    ) -> Self {
        let sync = RepoSynchronizer::new(&locations.cache_dir, client);
        let presets = PresetRegistry::new(&locations.presets_dir);
        Self {
            locations,
            home,
            linker,
            sync,
            presets,
            detection,
        }
    }

    /// Create the production service: platform links, `git` client
    pub fn from_config(config: &Config, home: &Path, cwd: &Path) -> Self {
        let mut service = Self::new(
            config.locations(home, cwd),
            home.to_path_buf(),
            SkillLinker::platform(),
            Box::new(GitClient::new()),
            config.skills.detection,
        );
        service.sync = service.sync.with_host(&config.sync.host);
        service
    }

    fn settings(&self) -> SettingsStore {
        SettingsStore::new(&self.locations.project_settings)
    }

    /// Link skills from a repository (or local directory) and merge its permissions
    pub fn add(&self, source: &str, scope: Scope) -> Result<AddReport> {
        let repo_dir = if is_local_path(source) {
            self.resolve_local(source)?
        } else {
            let spec = RepoSpec::parse(source)?;
            self.sync.sync(&spec)?
        };

        let (links, merged_keys) = self.refresh(&repo_dir, scope)?;
        Ok(AddReport {
            skills_dir: self.locations.skills_dir(scope).to_path_buf(),
            links,
            settings: self.locations.project_settings.clone(),
            merged_keys,
        })
    }

    /// Pull one cached repository, or all of them, and refresh links and permissions
    pub fn update(&self, repo: Option<&str>, scope: Scope) -> Result<Vec<RepoUpdate>> {
        let specs = match repo {
            Some(repo) => {
                let spec = RepoSpec::parse(repo)?;
                if !self.sync.is_installed(&spec) {
                    let err = SkillsetError::not_found("Repository", spec.to_string());
                    return Err(anyhow::Error::new(err)
                        .context(format!("Use 'skillset add {}' first", spec)));
                }
                vec![spec]
            }
            None => self.sync.installed()?,
        };

        let mut updates = Vec::with_capacity(specs.len());
        for spec in specs {
            let repo_dir = self.sync.sync(&spec)?;
            let (links, merged_keys) = self.refresh(&repo_dir, scope)?;
            updates.push(RepoUpdate {
                repo: spec,
                links,
                merged_keys,
            });
        }
        Ok(updates)
    }

    /// Merge named presets (or auto-detected built-ins) into the project settings
    pub fn apply(&self, names: &[String], dry_run: bool) -> Result<ApplyReport> {
        let detected = names.is_empty();
        let layers: Vec<(String, Document)> = if detected {
            detect_project_presets(&self.locations.project_dir)
                .into_iter()
                .filter_map(|name| builtin(name).map(|doc| (name.to_string(), doc)))
                .collect()
        } else {
            names
                .iter()
                .map(|name| -> Result<(String, Document)> {
                    Ok((name.clone(), self.presets.resolve(name)?))
                })
                .collect::<Result<_>>()?
        };

        let rules: usize = layers.iter().map(|(_, doc)| doc.allow_rule_count()).sum();
        let report = ApplyReport {
            presets: layers.iter().map(|(name, _)| name.clone()).collect(),
            rules,
            settings: self.locations.project_settings.clone(),
            detected,
            dry_run,
        };

        if dry_run || layers.is_empty() {
            return Ok(report);
        }

        let store = self.settings();
        let merged = layers
            .into_iter()
            .fold(store.load()?, |acc, (_, doc)| deep_merge(acc, doc));
        store.save(&merged)?;
        info!("Applied {} preset(s) to {:?}", report.presets.len(), store.path());
        Ok(report)
    }

    /// Save the project settings as a reusable preset
    pub fn save_preset(&self, name: &str) -> Result<PathBuf> {
        let store = self.settings();
        if !store.exists() {
            return Err(SkillsetError::not_found(
                "Settings file",
                store.path().display().to_string(),
            )
            .into());
        }
        let doc = store.load()?;
        Ok(self.presets.save(name, &doc)?)
    }

    /// Remove a linked skill
    pub fn remove(&self, name: &str, scope: Scope) -> Result<PathBuf> {
        let dir = self.locations.skills_dir(scope);
        self.linker
            .unlink(dir, name)
            .with_context(|| format!("Cannot remove '{}' from {}", name, dir.display()))?;
        Ok(dir.to_path_buf())
    }

    /// Installed skills in both scopes plus available presets
    pub fn list(&self) -> Result<Listing> {
        Ok(Listing {
            global_dir: self.locations.global_skills_dir.clone(),
            global: self.listed(Scope::Global)?,
            project_dir: self.locations.project_skills_dir.clone(),
            project: self.listed(Scope::Project)?,
            presets_dir: self.presets.dir().to_path_buf(),
            saved_presets: self.presets.saved()?,
            builtin_presets: builtin_names(),
        })
    }

    fn listed(&self, scope: Scope) -> Result<Vec<ListedSkill>> {
        let dir = self.locations.skills_dir(scope);
        let entries = installed_skills(self.linker.backend(), dir)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let description = Skill::from_dir(&dir.join(&entry.name))
                    .and_then(|skill| skill.metadata())
                    .map(|meta| meta.description)
                    .filter(|d| !d.is_empty());
                ListedSkill {
                    name: entry.name,
                    link_target: entry.link_target,
                    description,
                }
            })
            .collect())
    }

    fn refresh(&self, repo_dir: &Path, scope: Scope) -> Result<(LinkReport, Vec<String>)> {
        let skills = self.detection.discover(repo_dir);
        let links = self
            .linker
            .link_all(&skills, self.locations.skills_dir(scope))?;
        let mut merged_keys = merge_repo_permissions(repo_dir, &self.settings())?;
        merged_keys.sort();
        Ok((links, merged_keys))
    }

    fn resolve_local(&self, source: &str) -> Result<PathBuf> {
        let expanded = match source.strip_prefix('~') {
            Some(rest) => self.home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(source),
        };
        if !expanded.is_dir() {
            return Err(SkillsetError::not_found("Directory", expanded.display().to_string()).into());
        }
        expanded
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", expanded.display()))
    }
}

/// Sources starting with `/`, `.` or `~` are local directories, not `owner/repo`
fn is_local_path(source: &str) -> bool {
    source.starts_with(['/', '.', '~'])
}
