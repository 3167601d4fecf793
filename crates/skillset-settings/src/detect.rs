//! Guess which built-in presets fit a project from marker files

use std::path::Path;

const MARKERS: &[(&str, &[&str])] = &[
    ("git", &[".git"]),
    ("node", &["package.json"]),
    (
        "python",
        &["pyproject.toml", "setup.py", "requirements.txt", "Pipfile"],
    ),
    (
        "docker",
        &[
            "Dockerfile",
            "docker-compose.yml",
            "docker-compose.yaml",
            "compose.yml",
        ],
    ),
    ("k8s", &["k8s", "kubernetes", "helm", "Chart.yaml"]),
];

/// Built-in preset names applicable to `project_dir`, in fixed order
pub fn detect_project_presets(project_dir: &Path) -> Vec<&'static str> {
    MARKERS
        .iter()
        .filter(|(_, files)| files.iter().any(|f| project_dir.join(f).exists()))
        .map(|(preset, _)| *preset)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detects_in_fixed_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Chart.yaml"), "").unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert_eq!(
            detect_project_presets(dir.path()),
            vec!["git", "python", "k8s"]
        );
    }

    #[test]
    fn test_empty_project() {
        let dir = TempDir::new().unwrap();
        assert!(detect_project_presets(dir.path()).is_empty());
    }
}
