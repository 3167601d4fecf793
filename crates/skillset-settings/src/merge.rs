//! Deep merge of configuration documents
//!
//! - Mappings: merge key by key (recursive)
//! - Sequences: set union, deduplicated by equality
//! - Anything else: overlay wins
//!
//! Union keeps first occurrences (base items, then new overlay items) so the
//! output is reproducible, but callers must not depend on sequence order.

use crate::document::Document;

/// Deep merge `overlay` on top of `base`.
///
/// Pure and total. Keys only in `base` survive untouched, keys only in
/// `overlay` are taken as-is.
pub fn deep_merge(base: Document, overlay: Document) -> Document {
    match (base, overlay) {
        (Document::Mapping(mut base_map), Document::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Document::Mapping(base_map)
        }

        (Document::Sequence(base_items), Document::Sequence(overlay_items)) => {
            Document::Sequence(union(base_items, overlay_items))
        }

        // Scalars, nulls and mismatched variants: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge layers in order, least specific first
pub fn merge_layers<I>(layers: I) -> Document
where
    I: IntoIterator<Item = Document>,
{
    layers.into_iter().fold(Document::empty(), deep_merge)
}

// Quadratic, but permission lists are short and nested elements are not hashable.
fn union(base: Vec<Document>, overlay: Vec<Document>) -> Vec<Document> {
    let mut out: Vec<Document> = Vec::with_capacity(base.len() + overlay.len());
    for item in base.into_iter().chain(overlay) {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn doc(value: serde_json::Value) -> Document {
        Document::from(value)
    }

    fn string_set(doc: &Document, keys: &[&str]) -> BTreeSet<String> {
        doc.pointer(keys)
            .and_then(Document::as_sequence)
            .unwrap()
            .iter()
            .map(|d| d.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_scalar_override() {
        let result = deep_merge(doc(json!({"model": "sonnet"})), doc(json!({"model": "opus"})));
        assert_eq!(result, doc(json!({"model": "opus"})));
    }

    #[test]
    fn test_disjoint_keys_are_kept() {
        let a = doc(json!({"a": 1, "nested": {"x": [1]}}));
        let b = doc(json!({"b": "two", "other": {"y": null}}));
        let result = deep_merge(a, b);

        assert_eq!(
            result,
            doc(json!({"a": 1, "nested": {"x": [1]}, "b": "two", "other": {"y": null}}))
        );
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let a = doc(json!({"permissions": {"allow": ["Bash(git *)"]}, "env": {"CI": "1"}}));
        assert_eq!(deep_merge(a.clone(), Document::empty()), a);
        assert_eq!(deep_merge(Document::empty(), a.clone()), a);
    }

    #[test]
    fn test_object_deep_merge() {
        let base = doc(json!({"permissions": {"allow": ["a"], "defaultMode": "ask"}}));
        let overlay = doc(json!({"permissions": {"defaultMode": "acceptEdits", "deny": ["b"]}}));
        let result = deep_merge(base, overlay);

        assert_eq!(
            result.pointer(&["permissions", "defaultMode"]).and_then(Document::as_str),
            Some("acceptEdits")
        );
        assert_eq!(string_set(&result, &["permissions", "allow"]).len(), 1);
        assert_eq!(string_set(&result, &["permissions", "deny"]).len(), 1);
    }

    #[test]
    fn test_sequence_union_without_duplicates() {
        let base = doc(json!({"permissions": {"allow": ["Bash(git *)", "Bash(git *)", "Read"]}}));
        let overlay = doc(json!({"permissions": {"allow": ["Bash(npm *)", "Read"]}}));
        let result = deep_merge(base, overlay);

        let allow = result
            .pointer(&["permissions", "allow"])
            .and_then(Document::as_sequence)
            .unwrap();
        assert_eq!(allow.len(), 3);
        assert_eq!(
            string_set(&result, &["permissions", "allow"]),
            ["Bash(git *)", "Bash(npm *)", "Read"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_sequence_union_with_nested_elements() {
        let base = doc(json!({"hooks": [{"matcher": "Bash"}, [1, 2]]}));
        let overlay = doc(json!({"hooks": [{"matcher": "Bash"}, {"matcher": "Edit"}, [1, 2]]}));
        let result = deep_merge(base, overlay);

        let hooks = result.get("hooks").and_then(Document::as_sequence).unwrap();
        assert_eq!(hooks.len(), 3);
        assert!(hooks.contains(&doc(json!({"matcher": "Edit"}))));
    }

    #[test]
    fn test_mismatched_types_overlay_wins() {
        let result = deep_merge(
            doc(json!({"a": ["x"], "b": {"c": 1}, "d": 1})),
            doc(json!({"a": "x", "b": [1], "d": null})),
        );
        assert_eq!(result, doc(json!({"a": "x", "b": [1], "d": null})));
    }

    #[test]
    fn test_not_commutative_on_scalar_collision() {
        let a = doc(json!({"mode": "a"}));
        let b = doc(json!({"mode": "b"}));
        assert_ne!(deep_merge(a.clone(), b.clone()), deep_merge(b, a));
    }

    #[test]
    fn test_merge_layers_is_left_fold() {
        let builtin = doc(json!({"permissions": {"allow": ["Bash(git *)"]}, "mode": "builtin"}));
        let user = doc(json!({"mode": "user"}));
        let repo = doc(json!({"permissions": {"allow": ["Bash(make *)"]}}));

        let folded = merge_layers(vec![builtin.clone(), user.clone(), repo.clone()]);
        let stepwise = deep_merge(deep_merge(builtin, user), repo);

        assert_eq!(folded, stepwise);
        assert_eq!(folded.get("mode").and_then(Document::as_str), Some("user"));
        assert_eq!(folded.allow_rule_count(), 2);
    }

    #[test]
    fn test_top_level_non_mapping_overlay_replaces() {
        assert_eq!(deep_merge(doc(json!({"a": 1})), doc(json!(5))), doc(json!(5)));
        assert_eq!(deep_merge(doc(json!([1])), doc(json!([1, 2]))), doc(json!([1, 2])));
    }
}
