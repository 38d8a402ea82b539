//! @acp:module "Action Registry"
//! @acp:summary "Lookup of already existing actions for ID uniqueness checks"
//! @acp:domain cli
//! @acp:layer io

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::model::RuntimeType;
use crate::validate::sanitize_identifier;

/// Name of the definition file every action directory carries
pub const DEFINITION_FILE: &str = "action.yaml";

/// Deepest level at which `action.yaml` files are looked for below the root
const MAX_SCAN_DEPTH: usize = 4;

/// @acp:summary "Read-only view of the actions that already exist"
pub trait ActionRegistry {
    /// Whether an action with this (sanitized) ID exists
    fn exists(&self, id: &str) -> bool;
}

impl ActionRegistry for HashSet<String> {
    fn exists(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// An action found on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredAction {
    pub id: String,
    pub path: PathBuf,
    pub title: Option<String>,
    pub runtime: Option<RuntimeType>,
}

#[derive(Debug, Deserialize)]
struct DefinitionHeader {
    #[serde(default)]
    action: Option<ActionHeader>,
    #[serde(default)]
    runtime: Option<RuntimeHeader>,
}

#[derive(Debug, Deserialize)]
struct ActionHeader {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuntimeHeader {
    #[serde(rename = "type")]
    runtime_type: Option<RuntimeType>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// @acp:summary "Registry backed by the action directories below an output root"
///
/// Every `action.yaml` below the root names an action after its parent
/// directory. The tree is scanned on each lookup so the answer reflects the
/// disk at the moment of the check.
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    root: PathBuf,
}

impl DirectoryRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn definition_files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .max_depth(MAX_SCAN_DEPTH)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == DEFINITION_FILE)
            .map(|e| e.into_path())
    }

    fn id_for(path: &Path) -> Option<String> {
        path.parent()
            .and_then(|dir| dir.file_name())
            .map(|name| sanitize_identifier(&name.to_string_lossy()))
    }

    /// All actions below the root, sorted by ID.
    ///
    /// A definition that cannot be parsed is still listed, without title or
    /// runtime, so its ID stays reserved.
    pub fn discover(&self) -> Result<Vec<DiscoveredAction>> {
        let mut actions = Vec::new();

        for path in self.definition_files() {
            let Some(id) = Self::id_for(&path) else {
                continue;
            };

            let header = std::fs::read_to_string(&path)
                .ok()
                .and_then(|content| match serde_yaml::from_str::<DefinitionHeader>(&content) {
                    Ok(header) => Some(header),
                    Err(e) => {
                        tracing::warn!("Unreadable definition {}: {}", path.display(), e);
                        None
                    }
                });

            let (title, runtime) = match header {
                Some(h) => (
                    h.action.and_then(|a| a.title),
                    h.runtime.and_then(|r| r.runtime_type),
                ),
                None => (None, None),
            };

            actions.push(DiscoveredAction {
                id,
                path,
                title,
                runtime,
            });
        }

        actions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(actions)
    }
}

impl ActionRegistry for DirectoryRegistry {
    fn exists(&self, id: &str) -> bool {
        let wanted = sanitize_identifier(id);
        self.definition_files()
            .filter_map(|p| Self::id_for(&p))
            .any(|found| found == wanted)
    }
}
