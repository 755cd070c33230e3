//! Package data model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A publishable package in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// Directory holding the package manifest. Build and publish run here.
    pub path: PathBuf,
    /// Internal dependencies only, sorted and deduplicated.
    pub deps: SmallVec<[String; 4]>,
    pub build_script: Option<String>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
        deps: Vec<String>,
        build_script: Option<String>,
    ) -> Self {
        let mut deps = deps;
        deps.sort();
        deps.dedup();
        Self {
            name: name.into(),
            version: version.into(),
            path: path.into(),
            deps: SmallVec::from_vec(deps),
            build_script,
        }
    }

    #[inline]
    pub fn has_build(&self) -> bool {
        self.build_script.is_some()
    }
}
