//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("Manifest {} is missing required field '{field}'", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Duplicate package name '{name}' in {} and {}", first.display(), second.display())]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid workspace pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No publishable packages found under {0}")]
    EmptyWorkspace(PathBuf),

    #[error("Unknown package(s) in --only: {}. Available packages: {available}", names.join(", "))]
    UnknownPackages { names: Vec<String>, available: String },

    #[error("Package '{package}' is excluded but required by '{required_by}'. Drop --strict-exclude to skip it anyway.")]
    ExcludedDependency {
        package: String,
        required_by: String,
    },

    #[error("No packages selected. Check --only and --exclude.")]
    NoTargets,

    #[error("Invalid tag '{0}': tag must be non-empty and contain no whitespace")]
    InvalidTag(String),

    #[error("Working tree at {} has uncommitted changes. Commit them or pass --allow-dirty.", .0.display())]
    DirtyWorkingTree(PathBuf),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Circular dependency detected between: {0}. Refusing to publish in fallback order.")]
    CircularDependency(String),

    #[error("Failed to spawn '{program}' for {package}: {message}")]
    Spawn {
        package: String,
        program: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Toml {
            error,
            context: "polypub.toml".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
