use std::path::PathBuf;

use polypub_core::discovery::select_manifests;
use polypub_core::manifest::{normalize_pattern, WorkspacePatterns};

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn test_normalize_pattern() {
    assert_eq!(normalize_pattern("packages/*"), "packages/*/package.json");
    assert_eq!(normalize_pattern("./packages/*/"), "packages/*/package.json");
    assert_eq!(
        normalize_pattern("packages/*/package.json"),
        "packages/*/package.json"
    );
}

#[test]
fn test_default_patterns() {
    let patterns = WorkspacePatterns::default();
    assert_eq!(patterns.include, vec!["packages/*/package.json"]);
    assert!(patterns.exclude.is_empty());
}

#[test]
fn test_include_minus_exclude() {
    let patterns = WorkspacePatterns::from_patterns(["packages/*", "!packages/private-*"]);
    let candidates = paths(&[
        "packages/a/package.json",
        "packages/private-x/package.json",
        "apps/web/package.json",
    ]);

    let selected = select_manifests(&patterns, &candidates).unwrap();
    assert_eq!(
        selected.into_iter().collect::<Vec<_>>(),
        paths(&["packages/a/package.json"])
    );
}

#[test]
fn test_single_star_does_not_cross_directories() {
    let patterns = WorkspacePatterns::from_patterns(["packages/*"]);
    let candidates = paths(&["packages/a/package.json", "packages/a/nested/package.json"]);

    let selected = select_manifests(&patterns, &candidates).unwrap();
    assert_eq!(selected.len(), 1);
}

#[test]
fn test_double_star_spans_depth() {
    let patterns = WorkspacePatterns::from_patterns(["packages/**"]);
    let candidates = paths(&["packages/a/package.json", "packages/a/nested/package.json"]);

    let selected = select_manifests(&patterns, &candidates).unwrap();
    assert_eq!(selected.len(), 2);
}

#[test]
fn test_invalid_pattern() {
    let patterns = WorkspacePatterns::from_patterns(["packages/[a"]);
    let err = select_manifests(&patterns, &[]).unwrap_err();
    assert!(err.to_string().contains("packages/[a"));
}
