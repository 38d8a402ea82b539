//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::{ContainerPreset, RuntimeType, WD_ACTIONS_BASE_DIR};

/// Default config file name, looked up in the current directory
pub const CONFIG_FILE: &str = ".scaffold.json";

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

fn default_working_directory() -> String {
    WD_ACTIONS_BASE_DIR.to_string()
}

fn default_interactive() -> bool {
    true
}

fn is_default_output(p: &Path) -> bool {
    p == Path::new(".")
}

/// @acp:summary "Scaffolding defaults for a project"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory below which `actions/` and `plugins/` live
    #[serde(default = "default_output", skip_serializing_if = "is_default_output")]
    pub output: PathBuf,

    /// Runtime preselected in the wizard
    #[serde(default)]
    pub runtime: RuntimeType,

    /// Container preset preselected in the wizard
    #[serde(default)]
    pub preset: ContainerPreset,

    #[serde(default = "default_working_directory")]
    pub working_directory: String,

    /// Set to false to never prompt, even on a terminal
    #[serde(default = "default_interactive")]
    pub interactive: bool,

    /// On-disk template library replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            runtime: RuntimeType::default(),
            preset: ContainerPreset::default(),
            working_directory: default_working_directory(),
            interactive: default_interactive(),
            templates: None,
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }

    /// Load `path` if it exists; a missing file means defaults, a broken one is an error
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
