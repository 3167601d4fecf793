//! Skillset Settings
//!
//! Configuration documents, the deep merge engine, settings files on disk
//! and the preset registry.

pub mod builtins;
pub mod detect;
pub mod document;
pub mod merge;
pub mod presets;
pub mod store;

pub use builtins::{builtin, builtin_names};
pub use detect::detect_project_presets;
pub use document::{Document, Scalar};
pub use merge::{deep_merge, merge_layers};
pub use presets::{PresetRegistry, PresetSource};
pub use store::{find_repo_permissions, merge_repo_permissions, SettingsStore};
