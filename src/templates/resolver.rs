//! @acp:module "Template Resolver"
//! @acp:summary "Select and compile the templates for a runtime and preset"
//! @acp:domain cli
//! @acp:layer service
//!
//! # Store layout
//!
//! ```text
//! definition/action.yaml.tmpl        shared definition blocks
//! definition/<runtime>.yaml.tmpl     runtime-specific definition blocks
//! files/<runtime>/...                supporting files (plugin, shell)
//! files/container/*.tmpl             files shared by every container preset
//! files/container/<preset>/...       preset overlay
//! ```
//!
//! Definition files declare named blocks with `{{#*inline "name"}}...{{/inline}}`.
//! All blocks from both files are registered as partials and the root
//! template includes them in sorted name order, so the output does not depend
//! on discovery order. A runtime file may redefine a shared block.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;

use super::renderer::{new_registry, output_name, CompiledTemplates};
use super::store::{join, TemplateStore};
use crate::error::{Result, ScaffoldError};
use crate::model::{ContainerPreset, RuntimeType};

/// Namespace holding the definition fragments
pub const DEFINITION_NAMESPACE: &str = "definition";
/// Namespace holding the supporting file trees
pub const FILES_NAMESPACE: &str = "files";
/// Shared definition fragment
pub const DEFINITION_BASE: &str = "action.yaml.tmpl";
/// Name of the synthesized root template (and of the rendered definition file)
pub const DEFINITION_OUTPUT: &str = "action.yaml";

/// Named definition block: `{{#*inline "name"}}body{{/inline}}`
/// Groups: 1=name, 2=body
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{\{#\*inline\s+"([A-Za-z0-9_]+)"\s*\}\}\n?(.*?)\{\{/inline\}\}"#).unwrap()
});

/// Template files inside a directory
static TEMPLATE_FILE_PATTERN: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new("*.tmpl").unwrap());

/// Split a definition fragment into its named blocks.
///
/// Non-blank text outside any block is returned under a name derived from
/// the file name so it is not silently lost.
fn split_blocks(file_name: &str, source: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    for caps in BLOCK_PATTERN.captures_iter(source) {
        let mut body = caps[2].to_string();
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        blocks.push((caps[1].to_string(), body));
    }

    let rest = BLOCK_PATTERN.replace_all(source, "");
    if !rest.trim().is_empty() {
        let name: String = file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        blocks.push((name, rest.into_owned()));
    }

    blocks
}

/// One directory of the resolved file tree
#[derive(Debug)]
pub struct TemplateDir {
    /// Directory inside the files namespace
    pub source: String,
    /// Output directory relative to the action directory
    pub target: PathBuf,
    pub templates: CompiledTemplates,
}

/// @acp:summary "Ordered, compiled file templates for one runtime/preset"
///
/// Directories are ordered most-general layer first; a later directory that
/// renders the same relative path overwrites the earlier output.
#[derive(Debug, Default)]
pub struct TemplateSet {
    pub dirs: Vec<TemplateDir>,
}

impl TemplateSet {
    /// Relative paths of every file this set renders, sorted and de-duplicated
    pub fn output_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .dirs
            .iter()
            .flat_map(|d| {
                d.templates
                    .targets()
                    .iter()
                    .map(|name| d.target.join(output_name(name)))
            })
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }
}

/// A directory tree contributing to the file set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Root inside the files namespace
    pub root: String,
    /// Whether subdirectories are part of the layer
    pub recursive: bool,
}

/// @acp:summary "Resolves template precedence over an injected store"
pub struct TemplateResolver<'s> {
    store: &'s dyn TemplateStore,
}

impl<'s> TemplateResolver<'s> {
    pub fn new(store: &'s dyn TemplateStore) -> Self {
        Self { store }
    }

    /// Every directory below `base` (relative to the files namespace),
    /// depth-first with each directory listed after its descendants and
    /// `base` itself last.
    pub fn subdirectories(&self, base: &str) -> Result<Vec<String>> {
        let mut dirs = Vec::new();
        for entry in self.store.read_dir(&join(FILES_NAMESPACE, base))? {
            if entry.is_dir {
                dirs.extend(self.subdirectories(&join(base, &entry.name))?);
            }
        }
        dirs.push(base.to_string());
        Ok(dirs)
    }

    /// Compile the definition template for a runtime.
    pub fn definition_template(&self, runtime: RuntimeType) -> Result<CompiledTemplates> {
        let runtime_file = format!("{}.yaml.tmpl", runtime);
        let mut blocks = BTreeMap::new();

        for file in [DEFINITION_BASE, runtime_file.as_str()] {
            let path = join(DEFINITION_NAMESPACE, file);
            let bytes = self.store.read(&path)?;
            let source = String::from_utf8(bytes).map_err(|_| {
                ScaffoldError::Other(format!("template {} is not valid UTF-8", path))
            })?;

            for (name, body) in split_blocks(file, &source) {
                if blocks.insert(name.clone(), body).is_some() {
                    tracing::debug!("Definition block '{}' overridden by {}", name, path);
                }
            }
        }

        let mut registry = new_registry();
        let mut root = String::new();
        // BTreeMap iteration is sorted by name
        for (name, body) in &blocks {
            registry.register_template_string(name, body)?;
            root.push_str(&format!("{{{{> {}}}}}", name));
        }
        registry.register_template_string(DEFINITION_OUTPUT, root)?;

        tracing::debug!(
            "Definition template for {} built from {} blocks",
            runtime,
            blocks.len()
        );
        Ok(CompiledTemplates::new(
            registry,
            vec![DEFINITION_OUTPUT.to_string()],
        ))
    }

    /// Compile every `*.tmpl` file directly inside `dir` (relative to the
    /// files namespace). A directory without templates yields an empty set.
    pub fn files_templates(&self, dir: &str) -> Result<CompiledTemplates> {
        let store_dir = join(FILES_NAMESPACE, dir);
        let mut registry = new_registry();
        let mut targets = Vec::new();

        for entry in self.store.read_dir(&store_dir)? {
            if entry.is_dir || !TEMPLATE_FILE_PATTERN.matches(&entry.name) {
                continue;
            }
            let path = join(&store_dir, &entry.name);
            let bytes = self.store.read(&path)?;
            let source = String::from_utf8(bytes).map_err(|_| {
                ScaffoldError::Other(format!("template {} is not valid UTF-8", path))
            })?;
            registry.register_template_string(&entry.name, source)?;
            targets.push(entry.name);
        }

        Ok(CompiledTemplates::new(registry, targets))
    }

    /// Layers making up the file tree, most general first
    pub fn layers(runtime: RuntimeType, preset: ContainerPreset) -> Vec<Layer> {
        match runtime {
            RuntimeType::Container => vec![
                Layer {
                    root: runtime.to_string(),
                    recursive: false,
                },
                Layer {
                    root: format!("{}/{}", runtime, preset),
                    recursive: true,
                },
            ],
            _ => vec![Layer {
                root: runtime.to_string(),
                recursive: true,
            }],
        }
    }

    /// Resolve and compile the whole file tree for a runtime and preset
    pub fn resolve_files(&self, runtime: RuntimeType, preset: ContainerPreset) -> Result<TemplateSet> {
        let mut set = TemplateSet::default();

        for layer in Self::layers(runtime, preset) {
            let dirs = if layer.recursive {
                self.subdirectories(&layer.root)?
            } else {
                vec![layer.root.clone()]
            };

            for dir in dirs {
                let relative = dir
                    .strip_prefix(&layer.root)
                    .unwrap_or_default()
                    .trim_start_matches('/');
                let templates = self.files_templates(&dir)?;
                tracing::debug!("Resolved {} ({} templates)", dir, templates.len());
                set.dirs.push(TemplateDir {
                    target: PathBuf::from(relative),
                    source: dir,
                    templates,
                });
            }
        }

        Ok(set)
    }
}
