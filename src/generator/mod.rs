//! @acp:module "Generator"
//! @acp:summary "Materialize an action directory from the template library"
//! @acp:domain cli
//! @acp:layer service
//!
//! Generation is all-or-nothing: the action directory is created first and a
//! [`RollbackGuard`] removes it again unless every render step succeeded.
//! Writes are not transactional on their own; removal of the whole directory
//! is what keeps half-written actions off disk.

pub mod dirs;

use std::path::{Path, PathBuf};

pub use dirs::{ensure_dir, DirectoryManager, RollbackOutcome};

use crate::error::Result;
use crate::model::ActionDescription;
use crate::templates::{render, TemplateResolver, TemplateStore};

/// Removes the action directory on drop unless committed
pub struct RollbackGuard<'a> {
    dirs: &'a DirectoryManager,
    dir: PathBuf,
    created: bool,
    armed: bool,
}

impl<'a> RollbackGuard<'a> {
    /// `created` is false when the directory existed before generation
    pub fn new(dirs: &'a DirectoryManager, dir: PathBuf, created: bool) -> Self {
        Self {
            dirs,
            dir,
            created,
            armed: true,
        }
    }

    /// Mark the generation successful; nothing is removed
    pub fn commit(mut self) {
        self.armed = false;
    }

    fn run(&self) -> RollbackOutcome {
        if !self.created {
            tracing::warn!(
                "Directory {} existed before generation and may contain partial output. Clean it up manually.",
                self.dir.display()
            );
            return RollbackOutcome::PreExisting;
        }
        self.dirs.rollback(&self.dir)
    }
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let outcome = self.run();
            tracing::debug!("Rollback of {}: {:?}", self.dir.display(), outcome);
        }
    }
}

/// @acp:summary "Ties directory management, resolution and rendering together"
pub struct Generator<'s> {
    dirs: DirectoryManager,
    resolver: TemplateResolver<'s>,
}

impl<'s> Generator<'s> {
    /// Generator writing action directories below `root`
    pub fn new(root: impl Into<PathBuf>, store: &'s dyn TemplateStore) -> Self {
        Self {
            dirs: DirectoryManager::new(root),
            resolver: TemplateResolver::new(store),
        }
    }

    pub fn directories(&self) -> &DirectoryManager {
        &self.dirs
    }

    /// Generate the action and return its directory.
    ///
    /// On any error the created directory is removed before the error is
    /// returned; the returned error is always the original failure.
    pub fn generate(&self, values: &ActionDescription) -> Result<PathBuf> {
        let action_dir = self.dirs.action_dir(&values.id);
        let created = ensure_dir(&action_dir)?;
        tracing::info!("Generating action in {}", action_dir.display());

        let guard = RollbackGuard::new(&self.dirs, action_dir.clone(), created);

        self.generate_definition(&action_dir, values)?;
        self.generate_files(&action_dir, values)?;

        guard.commit();
        tracing::info!(
            "Action {} generated in {}",
            values.id,
            action_dir.display()
        );
        Ok(action_dir)
    }

    fn generate_definition(&self, output: &Path, values: &ActionDescription) -> Result<()> {
        let definition = self.resolver.definition_template(values.runtime_type())?;
        render(output, values, &definition)?;
        Ok(())
    }

    fn generate_files(&self, output: &Path, values: &ActionDescription) -> Result<()> {
        let set = self
            .resolver
            .resolve_files(values.runtime_type(), values.container_preset)?;

        for dir in &set.dirs {
            let target = output.join(&dir.target);
            ensure_dir(&target)?;

            if dir.templates.is_empty() {
                tracing::debug!("No templates in {}, skipping", dir.source);
                continue;
            }
            render(&target, values, &dir.templates)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuntimeType;
    use crate::templates::MemoryStore;
    use tempfile::TempDir;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_file(
                "definition/action.yaml.tmpl",
                "{{#*inline \"action\"}}\naction:\n  title: {{yaml title}}\n{{/inline}}",
            )
            .with_file(
                "definition/shell.yaml.tmpl",
                "{{#*inline \"runtime\"}}\nruntime:\n  type: shell\n{{/inline}}",
            )
            .with_file("files/shell/main.sh.tmpl", "echo {{id}}\n")
    }

    #[test]
    fn test_guard_commit_keeps_directory() {
        let temp = TempDir::new().unwrap();
        let dm = DirectoryManager::new(temp.path());
        let dir = dm.action_dir("demo");
        std::fs::create_dir_all(&dir).unwrap();

        RollbackGuard::new(&dm, dir.clone(), true).commit();
        assert!(dir.is_dir());

        drop(RollbackGuard::new(&dm, dir.clone(), false));
        assert!(dir.is_dir());

        drop(RollbackGuard::new(&dm, dir.clone(), true));
        assert!(!dir.exists());
    }

    #[test]
    fn test_generate_minimal_shell() {
        let temp = TempDir::new().unwrap();
        let store = store();
        let generator = Generator::new(temp.path(), &store);

        let values = ActionDescription::new("demo", "Demo", RuntimeType::Shell);
        let dir = generator.generate(&values).unwrap();

        assert_eq!(dir, temp.path().join("demo"));
        assert_eq!(
            std::fs::read_to_string(dir.join("action.yaml")).unwrap(),
            "action:\n  title: \"Demo\"\nruntime:\n  type: shell\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.join("main.sh")).unwrap(),
            "echo demo\n"
        );
    }

    #[test]
    fn test_generate_rolls_back_on_render_error() {
        let temp = TempDir::new().unwrap();
        let store = store().with_file("files/shell/z_broken.txt.tmpl", "{{missing_helper id}}");
        let generator = Generator::new(temp.path(), &store);

        let values = ActionDescription::new("demo", "Demo", RuntimeType::Shell);
        assert!(generator.generate(&values).is_err());
        assert!(!temp.path().join("demo").exists());
    }
}
