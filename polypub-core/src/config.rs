//! Workspace configuration from `polypub.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::Access;

pub const CONFIG_FILE: &str = "polypub.toml";

fn default_client() -> String {
    "npm".to_string()
}

/// Optional settings read from the workspace root. Command-line flags take
/// precedence over every value here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Package manager executable used for `run build` and `publish`.
    #[serde(default = "default_client")]
    pub client: String,
    /// Names that sort ahead of everything else when ordering ties.
    #[serde(default)]
    pub priority: Vec<String>,
    /// Fail instead of silently dropping an excluded dependency.
    #[serde(default)]
    pub strict_exclude: bool,
    /// Refuse to continue when the graph has a cycle.
    #[serde(default)]
    pub strict_cycles: bool,
    pub registry: Option<String>,
    pub access: Option<Access>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: default_client(),
            priority: Vec::new(),
            strict_exclude: false,
            strict_cycles: false,
            registry: None,
            access: None,
        }
    }
}

impl Config {
    /// Loads `<root>/polypub.toml`, or the defaults when it does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
