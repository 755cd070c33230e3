//! Manifest selection from workspace globs.
//!
//! Selection is a pure function of the patterns and a snapshot of candidate
//! paths; walking the filesystem happens in [`crate::scanner`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};
use crate::manifest::WorkspacePatterns;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
}

/// Returns the candidates matched by an include pattern and by no exclude
/// pattern. Candidates are paths relative to the workspace root.
pub fn select_manifests(
    patterns: &WorkspacePatterns,
    candidates: &[PathBuf],
) -> Result<BTreeSet<PathBuf>> {
    let include = compile(&patterns.include)?;
    let exclude = compile(&patterns.exclude)?;

    let included: BTreeSet<&PathBuf> = candidates
        .iter()
        .filter(|c| matches_any(&include, c))
        .collect();
    let excluded: BTreeSet<&PathBuf> = candidates
        .iter()
        .filter(|c| matches_any(&exclude, c))
        .collect();

    Ok(included
        .difference(&excluded)
        .map(|p| (*p).clone())
        .collect())
}
