//! @acp:module "Template Store"
//! @acp:summary "Read-only hierarchical byte stores holding the template library"
//! @acp:domain cli
//! @acp:layer io

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::{Result, ScaffoldError};

/// One immediate child of a store directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoreEntry {
    pub name: String,
    pub is_dir: bool,
}

/// @acp:summary "Read-only template storage keyed by `/`-separated paths"
///
/// Paths are relative to the store root; `""` is the root itself. A missing
/// path is reported as [`ScaffoldError::TemplateNotFound`], anything else as
/// an I/O error.
pub trait TemplateStore {
    /// List the immediate children of a directory, sorted by name
    fn read_dir(&self, path: &str) -> Result<Vec<StoreEntry>>;

    /// Read the bytes of a file
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Join two store paths with `/`
pub fn join(base: &str, name: &str) -> String {
    match (base.trim_end_matches('/'), name.trim_start_matches('/')) {
        ("", name) => name.to_string(),
        (base, "") => base.to_string(),
        (base, name) => format!("{}/{}", base, name),
    }
}

/// In-memory store. Directories exist implicitly through the files below them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        let path: String = path.into();
        self.files
            .insert(path.trim_matches('/').to_string(), content.into());
    }

    /// Builder-style [`MemoryStore::insert`]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TemplateStore for MemoryStore {
    fn read_dir(&self, path: &str) -> Result<Vec<StoreEntry>> {
        let dir = path.trim_matches('/');
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut entries = BTreeSet::new();
        for key in self.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => entries.insert(StoreEntry {
                    name: child.to_string(),
                    is_dir: true,
                }),
                None => entries.insert(StoreEntry {
                    name: rest.to_string(),
                    is_dir: false,
                }),
            };
        }

        if entries.is_empty() && !dir.is_empty() {
            return Err(ScaffoldError::TemplateNotFound(dir.to_string()));
        }
        Ok(entries.into_iter().collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let key = path.trim_matches('/');
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| ScaffoldError::TemplateNotFound(key.to_string()))
    }
}

/// Store backed by a directory on disk with the same layout as the built-in library
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            full.push(segment);
        }
        full
    }
}

fn not_found_or_io(path: &str, err: std::io::Error) -> ScaffoldError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ScaffoldError::TemplateNotFound(path.to_string())
    } else {
        ScaffoldError::Io(err)
    }
}

impl TemplateStore for DirStore {
    fn read_dir(&self, path: &str) -> Result<Vec<StoreEntry>> {
        let dir = self.resolve(path);
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| not_found_or_io(path, e))? {
            let entry = entry?;
            entries.push(StoreEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort();
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(self.resolve(path)).map_err(|e| not_found_or_io(path, e))
    }
}
