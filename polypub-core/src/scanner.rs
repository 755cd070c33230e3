//! Workspace scanner for discovering publishable packages.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::discovery::select_manifests;
use crate::error::{Error, Result};
use crate::manifest::{package_dir, PackageManifest, WorkspacePatterns, MANIFEST_FILE};
use crate::package::Package;

/// A manifest that parsed and is not private, before internal
/// dependencies are known.
struct ParsedManifest {
    manifest_path: PathBuf,
    name: String,
    version: String,
    dependency_names: Vec<String>,
    build_script: Option<String>,
}

/// Scans a workspace root for package manifests.
///
/// Reads the root `package.json` for workspace globs, matches them against
/// every manifest under the root and parses the matches into `Package`s.
pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Every `package.json` below the root, relative to it. Skips the root
    /// manifest, `node_modules` and hidden directories.
    ///
    /// # Errors
    ///
    /// Fails if any directory below the root cannot be read.
    pub fn snapshot(&self) -> Result<Vec<PathBuf>> {
        let entries = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                name != "node_modules" && !name.starts_with('.')
            })
            .collect::<std::result::Result<Vec<_>, walkdir::Error>>()
            .map_err(std::io::Error::from)?;

        let mut paths: Vec<PathBuf> = entries
            .into_iter()
            .filter(|e| e.file_type().is_file() && e.file_name() == MANIFEST_FILE)
            .filter_map(|e| e.path().strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .filter(|p| p.as_os_str() != MANIFEST_FILE)
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Scans the workspace. Private packages are dropped. Packages are
    /// returned sorted by name with `deps` limited to workspace names.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or invalid manifests, missing name or version,
    /// bad glob patterns, and duplicate package names.
    pub fn scan(&self) -> Result<Vec<Package>> {
        let patterns = WorkspacePatterns::load(&self.root)?;
        tracing::debug!(
            include = ?patterns.include,
            exclude = ?patterns.exclude,
            "workspace patterns"
        );

        let candidates = self.snapshot()?;
        let selected = select_manifests(&patterns, &candidates)?;
        tracing::debug!(
            candidates = candidates.len(),
            selected = selected.len(),
            "matched manifests"
        );

        let parsed: Result<Vec<Option<ParsedManifest>>> = selected
            .into_par_iter()
            .map(|relative| self.parse_manifest(&relative))
            .collect();

        let mut parsed: Vec<ParsedManifest> = parsed?.into_iter().flatten().collect();
        parsed.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.manifest_path.cmp(&b.manifest_path))
        });

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for manifest in &parsed {
            if let Some(first) = seen.insert(&manifest.name, &manifest.manifest_path) {
                return Err(Error::DuplicatePackage {
                    name: manifest.name.clone(),
                    first: first.to_path_buf(),
                    second: manifest.manifest_path.clone(),
                });
            }
        }

        let workspace_names: HashSet<String> = parsed.iter().map(|m| m.name.clone()).collect();

        Ok(parsed
            .into_iter()
            .map(|m| {
                let deps = m
                    .dependency_names
                    .into_iter()
                    .filter(|d| workspace_names.contains(d))
                    .collect();
                Package::new(
                    m.name,
                    m.version,
                    package_dir(&m.manifest_path),
                    deps,
                    m.build_script,
                )
            })
            .collect())
    }

    fn parse_manifest(&self, relative: &Path) -> Result<Option<ParsedManifest>> {
        let manifest_path = self.root.join(relative);
        let manifest = PackageManifest::load(&manifest_path)?;

        if manifest.private {
            tracing::debug!(path = %relative.display(), "skipping private package");
            return Ok(None);
        }

        let (name, version) = manifest.identity(&manifest_path)?;
        Ok(Some(ParsedManifest {
            manifest_path,
            name,
            version,
            dependency_names: manifest.dependency_names().into_iter().collect(),
            build_script: manifest.build_script(),
        }))
    }
}
