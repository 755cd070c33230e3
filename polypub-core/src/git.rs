//! Working tree cleanliness check.

use std::path::{Path, PathBuf};

use git2::{Repository, StatusOptions};

use crate::error::{Error, Result};

/// Answers whether the working tree has uncommitted changes.
pub trait WorkingTree {
    fn is_clean(&self) -> Result<bool>;
}

/// Git-backed working tree, discovered from a path inside the repository.
pub struct GitWorkingTree {
    path: PathBuf,
}

impl GitWorkingTree {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WorkingTree for GitWorkingTree {
    fn is_clean(&self) -> Result<bool> {
        let repo = Repository::discover(&self.path)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = repo.statuses(Some(&mut opts))?;
        tracing::debug!(changes = statuses.len(), "git status");
        Ok(statuses.is_empty())
    }
}

/// Fails with `DirtyWorkingTree` unless the tree is clean.
pub fn ensure_clean(tree: &dyn WorkingTree, root: &Path) -> Result<()> {
    if tree.is_clean()? {
        Ok(())
    } else {
        Err(Error::DirtyWorkingTree(root.to_path_buf()))
    }
}
