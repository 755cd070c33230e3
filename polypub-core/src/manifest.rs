//! `package.json` parsing for packages and the workspace root.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "package.json";
pub const DEFAULT_PATTERN: &str = "packages/*";

/// The subset of a package manifest the publisher reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub scripts: HashMap<String, String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub optional_dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, Value>,
}

impl PackageManifest {
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Name and version, both required and non-empty.
    pub fn identity(&self, path: &Path) -> Result<(String, String)> {
        let name = required(self.name.as_deref(), path, "name")?;
        let version = required(self.version.as_deref(), path, "version")?;
        Ok((name, version))
    }

    /// Runtime, optional and peer dependency names merged into one set.
    pub fn dependency_names(&self) -> BTreeSet<String> {
        self.dependencies
            .keys()
            .chain(self.optional_dependencies.keys())
            .chain(self.peer_dependencies.keys())
            .cloned()
            .collect()
    }

    pub fn build_script(&self) -> Option<String> {
        self.scripts.get("build").cloned()
    }
}

fn required(value: Option<&str>, path: &Path, field: &'static str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkspacesField {
    List(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
struct RootManifest {
    workspaces: Option<WorkspacesField>,
}

/// Include and exclude globs from the root manifest, normalized to
/// match manifest files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePatterns {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for WorkspacePatterns {
    fn default() -> Self {
        Self::from_patterns([DEFAULT_PATTERN])
    }
}

impl WorkspacePatterns {
    /// Splits raw patterns on a leading `!` and normalizes each one.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            match raw.strip_prefix('!') {
                Some(negated) => exclude.push(normalize_pattern(negated)),
                None => include.push(normalize_pattern(raw)),
            }
        }
        Self { include, exclude }
    }

    /// Reads the `workspaces` field of `<root>/package.json`.
    ///
    /// A missing root manifest or missing field falls back to the default
    /// pattern. A root manifest that is not valid JSON is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content, &path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let root: RootManifest = serde_json::from_str(content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(match root.workspaces {
            Some(WorkspacesField::List(patterns)) => Self::from_patterns(patterns),
            Some(WorkspacesField::Object { packages }) => Self::from_patterns(packages),
            None => Self::default(),
        })
    }
}

/// Points a workspace glob at the manifest file inside each match.
pub fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let pattern = pattern.trim_end_matches('/');
    if pattern == MANIFEST_FILE || pattern.ends_with(&format!("/{}", MANIFEST_FILE)) {
        pattern.to_string()
    } else if pattern.is_empty() {
        MANIFEST_FILE.to_string()
    } else {
        format!("{}/{}", pattern, MANIFEST_FILE)
    }
}

/// Directory containing a manifest path.
pub fn package_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
