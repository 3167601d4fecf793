use serde::Deserialize;
use skillset_skills::DetectionRule;
use skillset_sync::DEFAULT_HOST;
use skillset_types::Locations;
use std::path::{Path, PathBuf};

/// Optional overrides for every location the tool touches
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PathsConfig {
    pub cache_dir: Option<PathBuf>,
    pub presets_dir: Option<PathBuf>,
    pub global_skills_dir: Option<PathBuf>,
    pub project_skills_dir: Option<PathBuf>,
    pub project_settings: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SkillsConfig {
    #[serde(default)]
    pub detection: DetectionRule,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
}

impl Config {
    /// Global config path: ~/.config/skillset/config.toml
    fn global_config_path(home: &Path) -> PathBuf {
        home.join(".config").join("skillset").join("config.toml")
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.config/skillset/config.toml (optional)
    /// 2. Local override: ./skillset.toml (optional)
    /// 3. Environment variables with SKILLSET__ prefix (highest priority)
    pub fn load(home: &Path, cwd: &Path) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(Self::global_config_path(home)).required(false))
            .add_source(config::File::from(cwd.join("skillset.toml")).required(false))
            .add_source(config::Environment::with_prefix("SKILLSET").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config)
    }

    /// Resolve every location, falling back to the conventional layout
    pub fn locations(&self, home: &Path, cwd: &Path) -> Locations {
        let paths = &self.paths;
        let pick = |value: &Option<PathBuf>, default: PathBuf| value.clone().unwrap_or(default);

        Locations {
            cache_dir: pick(
                &paths.cache_dir,
                home.join(".cache").join("skillset").join("repos"),
            ),
            presets_dir: pick(
                &paths.presets_dir,
                home.join(".config").join("skillset").join("presets"),
            ),
            global_skills_dir: pick(
                &paths.global_skills_dir,
                home.join(".claude").join("skills"),
            ),
            project_skills_dir: pick(
                &paths.project_skills_dir,
                cwd.join(".claude").join("skills"),
            ),
            project_settings: pick(
                &paths.project_settings,
                cwd.join(".claude").join("settings.local.json"),
            ),
            project_dir: cwd.to_path_buf(),
        }
    }
}
