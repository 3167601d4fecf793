//! Built-in permission presets

use crate::document::Document;
use std::collections::BTreeMap;

const BUILTIN_PRESETS: &[(&str, &[&str])] = &[
    (
        "developer",
        &[
            "Bash(git *)",
            "Bash(npm *)",
            "Bash(npx *)",
            "Bash(yarn *)",
            "Bash(pnpm *)",
            "Bash(uv *)",
            "Bash(pip *)",
            "Bash(python *)",
            "Bash(node *)",
            "Bash(make *)",
            "Bash(cargo *)",
            "Bash(go *)",
        ],
    ),
    ("git", &["Bash(git *)", "Bash(gh *)"]),
    (
        "node",
        &[
            "Bash(npm *)",
            "Bash(npx *)",
            "Bash(yarn *)",
            "Bash(pnpm *)",
            "Bash(node *)",
        ],
    ),
    (
        "python",
        &[
            "Bash(uv *)",
            "Bash(pip *)",
            "Bash(python *)",
            "Bash(pytest *)",
            "Bash(ruff *)",
        ],
    ),
    ("docker", &["Bash(docker *)", "Bash(docker-compose *)"]),
    ("k8s", &["Bash(kubectl *)", "Bash(helm *)"]),
];

/// Names of the built-in presets, in table order
pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_PRESETS.iter().map(|(name, _)| *name).collect()
}

/// Built-in preset as `{"permissions": {"allow": [...]}}`
pub fn builtin(name: &str) -> Option<Document> {
    let (_, rules) = BUILTIN_PRESETS.iter().find(|(n, _)| *n == name)?;
    let allow = Document::Sequence(rules.iter().map(|rule| Document::from(*rule)).collect());
    let permissions = Document::Mapping(BTreeMap::from([("allow".to_string(), allow)]));
    Some(Document::Mapping(BTreeMap::from([(
        "permissions".to_string(),
        permissions,
    )])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in builtin_names() {
            let preset = builtin(name).unwrap();
            assert!(preset.allow_rule_count() > 0, "{name}");
        }
        assert_eq!(builtin_names().len(), 6);
    }

    #[test]
    fn test_developer_preset() {
        let developer = builtin("developer").unwrap();
        assert_eq!(developer.allow_rule_count(), 12);
        assert!(builtin("unknown").is_none());
    }
}
