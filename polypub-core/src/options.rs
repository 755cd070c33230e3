//! Run options and publish mode derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Registry access level passed through to the publish command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Restricted,
}

impl Access {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Restricted => "restricted",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a run publishes and whether it asks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    pub publish: bool,
    pub dry_run: bool,
}

impl RunMode {
    /// `--yes` implies `--publish`; without either the run is a dry run;
    /// `--dry-run` always wins.
    pub fn derive(explicit_publish: bool, auto_confirm: bool, explicit_dry_run: bool) -> Self {
        let publish = explicit_publish || auto_confirm;
        let dry_run = explicit_dry_run || !publish;
        Self { publish, dry_run }
    }
}

/// Checks a dist-tag: non-empty, no whitespace.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() || tag.chars().any(char::is_whitespace) {
        return Err(Error::InvalidTag(tag.to_string()));
    }
    Ok(())
}

/// Settings for one invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    pub tag: String,
    pub dry_run: bool,
    pub auto_confirm: bool,
    pub skip_build: bool,
    pub tolerate_republish: bool,
    pub allow_dirty: bool,
    pub run_scripts: bool,
    pub registry: Option<String>,
    pub access: Option<Access>,
    #[serde(skip)]
    pub otp: Option<String>,
    pub client: String,
}

impl RunOptions {
    /// Options for a dry run with every optional flag off.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            dry_run: true,
            auto_confirm: false,
            skip_build: false,
            tolerate_republish: false,
            allow_dirty: false,
            run_scripts: false,
            registry: None,
            access: None,
            otp: None,
            client: "npm".to_string(),
        }
    }

    /// Returns the options after validating the tag.
    pub fn validated(self) -> Result<Self> {
        validate_tag(&self.tag)?;
        Ok(self)
    }

    /// Confirmation is only asked for real publishes without `--yes`.
    #[inline]
    pub fn needs_confirmation(&self) -> bool {
        !self.dry_run && !self.auto_confirm
    }

    /// The working tree must be clean before a real publish.
    #[inline]
    pub fn requires_clean_tree(&self) -> bool {
        !self.dry_run && !self.allow_dirty
    }
}
