//! @acp:module "New Command"
//! @acp:summary "Scaffold a new action"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `scaffold new`: wizard (or caller defaults), final validation,
//! then generation into `<output>/actions` or `<output>/plugins`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use console::style;

use crate::config::Config;
use crate::generator::Generator;
use crate::metadata::{FormEngine, MetadataCollector, TerminalForm};
use crate::model::{ActionDescription, ContainerPreset, RuntimeType};
use crate::registry::DirectoryRegistry;
use crate::templates::{embedded, DirStore, TemplateStore};

/// Directory below the output root holding shell and container actions
pub const ACTIONS_DIR: &str = "actions";
/// Directory below the output root holding plugin actions
pub const PLUGINS_DIR: &str = "plugins";

/// Options for the new command. Unset values fall back to the config.
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    pub output: Option<PathBuf>,
    pub runtime: Option<RuntimeType>,
    pub preset: Option<ContainerPreset>,
    pub id: Option<String>,
    pub title: Option<String>,
    /// On-disk template library
    pub templates: Option<PathBuf>,
    /// Skip interactive prompts
    pub yes: bool,
}

/// Root the generator writes below for a runtime
pub fn output_root(output: &Path, runtime: RuntimeType) -> PathBuf {
    match runtime {
        RuntimeType::Plugin => output.join(PLUGINS_DIR),
        RuntimeType::Container | RuntimeType::Shell => output.join(ACTIONS_DIR),
    }
}

fn template_store(templates: Option<&Path>) -> Result<Box<dyn TemplateStore>> {
    match templates {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Template directory {} does not exist", dir.display());
            }
            tracing::info!("Using templates from {}", dir.display());
            Ok(Box::new(DirStore::new(dir)))
        }
        None => Ok(Box::new(embedded::builtin())),
    }
}

/// Execute the new command, returning the generated action directory
pub fn execute_new(options: NewOptions, config: &Config) -> Result<PathBuf> {
    let output = options.output.unwrap_or_else(|| config.output.clone());
    let templates = options.templates.or_else(|| config.templates.clone());
    let store = template_store(templates.as_deref())?;

    let values = ActionDescription::new(
        options.id.unwrap_or_default(),
        options.title.unwrap_or_default(),
        options.runtime.unwrap_or(config.runtime),
    )
    .with_preset(options.preset.unwrap_or(config.preset))
    .with_working_directory(config.working_directory.as_str());

    let interactive = !options.yes && config.interactive && console::user_attended();

    let registry = DirectoryRegistry::new(&output);
    let collector = MetadataCollector::new(&registry);
    let mut terminal = TerminalForm::new();
    let form = if interactive {
        println!("{} New action\n", style("→").cyan());
        Some(&mut terminal as &mut dyn FormEngine)
    } else {
        None
    };

    let values = collector
        .collect(values, form)
        .context("Action description is not valid")?;

    let generator = Generator::new(output_root(&output, values.runtime_type()), store.as_ref());
    let dir = match generator.generate(&values) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!(
                "{} Generation of {} failed, nothing was kept",
                style("✗").red(),
                style(&values.id).cyan()
            );
            return Err(e).with_context(|| format!("Failed to generate action {}", values.id));
        }
    };

    println!(
        "{} Created {} action {} in {}",
        style("✓").green(),
        values.runtime_type(),
        style(&values.id).cyan(),
        dir.display()
    );

    if values.is_container() {
        println!(
            "  Image: {}  Preset: {}",
            style(&values.runtime.container.image).dim(),
            style(values.container_preset.label()).dim()
        );
    }

    Ok(dir)
}
