//! @acp:module "Directory Manager"
//! @acp:summary "Output path computation, directory creation and guarded removal"
//! @acp:domain cli
//! @acp:layer io

use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::validate::sanitize_identifier;

/// What happened when a failed generation tried to clean up
#[derive(Debug)]
pub enum RollbackOutcome {
    /// The directory and its contents were removed
    Removed,
    /// Nothing to remove: the path is missing or not a directory
    NotPresent,
    /// The directory existed before generation started and was left alone
    PreExisting,
    /// The path is not strictly inside the root, removal refused
    OutsideRoot,
    /// Removal was attempted and failed
    Failed(std::io::Error),
}

impl RollbackOutcome {
    /// True when the outcome needs the user's attention
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            RollbackOutcome::PreExisting | RollbackOutcome::OutsideRoot | RollbackOutcome::Failed(_)
        )
    }
}

/// @acp:summary "Owns the output root every action directory lives under"
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    root: PathBuf,
}

impl DirectoryManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/<sanitized id>`
    pub fn action_dir(&self, action_id: &str) -> PathBuf {
        self.root.join(sanitize_identifier(action_id))
    }

    /// Whether `path` is strictly below the root
    pub fn contains(&self, path: &Path) -> bool {
        path != self.root && path.starts_with(&self.root)
    }

    /// Remove a directory left behind by a failed generation.
    ///
    /// Only strict descendants of the root that exist as directories are
    /// removed. Problems are logged, never returned as errors.
    pub fn rollback(&self, dir: &Path) -> RollbackOutcome {
        if !self.contains(dir) {
            tracing::warn!(
                "Not removing directory outside of expected path: {}",
                dir.display()
            );
            return RollbackOutcome::OutsideRoot;
        }

        if !dir.is_dir() {
            return RollbackOutcome::NotPresent;
        }

        match std::fs::remove_dir_all(dir) {
            Ok(()) => {
                tracing::info!("Removed partially generated {}", dir.display());
                RollbackOutcome::Removed
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to clean up directory {}: {}. Remove it manually.",
                    dir.display(),
                    e
                );
                RollbackOutcome::Failed(e)
            }
        }
    }
}

/// Create a directory and its parents with owner/group-only permissions.
///
/// Returns `true` when the directory did not exist before.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }

    builder
        .create(path)
        .map_err(|source| ScaffoldError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(true)
}
