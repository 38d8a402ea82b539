//! @acp:module "Action Model"
//! @acp:summary "Data model of the action being scaffolded"
//! @acp:domain cli
//! @acp:layer model
//!
//! The [`ActionDescription`] is created with caller defaults, filled in by the
//! metadata collector, validated, and then handed read-only to the generator.
//! It is also the data model every template renders against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// @acp:summary "Execution mechanism targeted by the generated action"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Plugin,
    Container,
    #[default]
    Shell,
}

impl RuntimeType {
    pub fn all() -> &'static [RuntimeType] {
        &[RuntimeType::Plugin, RuntimeType::Container, RuntimeType::Shell]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeType::Plugin => "plugin",
            RuntimeType::Container => "container",
            RuntimeType::Shell => "shell",
        }
    }

    /// Human-readable label for prompts
    pub fn label(&self) -> &'static str {
        match self {
            RuntimeType::Plugin => "Plugin",
            RuntimeType::Container => "Container",
            RuntimeType::Shell => "Shell",
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuntimeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plugin" => Ok(RuntimeType::Plugin),
            "container" => Ok(RuntimeType::Container),
            "shell" => Ok(RuntimeType::Shell),
            _ => Err(format!(
                "Unknown runtime: {}. Use 'plugin', 'container' or 'shell'",
                s
            )),
        }
    }
}

/// @acp:summary "Container file preset (language toolchain)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerPreset {
    Go,
    Py,
    #[default]
    Sh,
}

impl ContainerPreset {
    pub fn all() -> &'static [ContainerPreset] {
        &[ContainerPreset::Go, ContainerPreset::Py, ContainerPreset::Sh]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerPreset::Go => "go",
            ContainerPreset::Py => "py",
            ContainerPreset::Sh => "sh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContainerPreset::Go => "Golang",
            ContainerPreset::Py => "Python",
            ContainerPreset::Sh => "Shell",
        }
    }
}

impl fmt::Display for ContainerPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContainerPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "go" | "golang" => Ok(ContainerPreset::Go),
            "py" | "python" => Ok(ContainerPreset::Py),
            "sh" | "shell" => Ok(ContainerPreset::Sh),
            _ => Err(format!("Unknown preset: {}. Use 'go', 'py' or 'sh'", s)),
        }
    }
}

/// Symbolic working directory: the directory holding the actions
pub const WD_ACTIONS_BASE_DIR: &str = "{{ .actions_base_dir }}";
/// Symbolic working directory: wherever the action is invoked from
pub const WD_CURRENT_WORKING_DIR: &str = "{{ .current_working_dir }}";

/// Working directory choices offered to container actions, `(label, value)`
pub const WORKING_DIRECTORIES: &[(&str, &str)] = &[
    ("Actions base dir", WD_ACTIONS_BASE_DIR),
    ("Current working dir", WD_CURRENT_WORKING_DIR),
];

/// @acp:summary "Primitive type of an argument or option"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Array,
}

impl ParamType {
    pub fn all() -> &'static [ParamType] {
        &[
            ParamType::String,
            ParamType::Number,
            ParamType::Integer,
            ParamType::Boolean,
            ParamType::Array,
        ]
    }

    /// Types allowed as array items (no nested arrays)
    pub fn item_types() -> &'static [ParamType] {
        &[
            ParamType::String,
            ParamType::Number,
            ParamType::Integer,
            ParamType::Boolean,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParamType::String => "String",
            ParamType::Number => "Number",
            ParamType::Integer => "Integer",
            ParamType::Boolean => "Boolean",
            ParamType::Array => "Array",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @acp:summary "One argument or option of the generated action"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    /// Typed default, matching `param_type` (or `items_type` per element)
    #[serde(default)]
    pub default: serde_json::Value,
    /// Element type, set if and only if `param_type` is [`ParamType::Array`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<ParamType>,
}

/// Which list a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Argument,
    Option,
}

impl ParamKind {
    pub fn plural(&self) -> &'static str {
        match self {
            ParamKind::Argument => "arguments",
            ParamKind::Option => "options",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ParamKind::Argument => "argument",
            ParamKind::Option => "option",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default)]
    pub image: String,
    /// `KEY=VALUE` lines
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub extra_hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// `KEY=VALUE` lines
    #[serde(default)]
    pub env: Vec<String>,
}

/// @acp:summary "Runtime block; only the config matching `runtime_type` is meaningful"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeSpec {
    #[serde(rename = "type")]
    pub runtime_type: RuntimeType,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

impl RuntimeSpec {
    pub fn new(runtime_type: RuntimeType) -> Self {
        Self {
            runtime_type,
            ..Default::default()
        }
    }
}

/// @acp:summary "Everything known about the action being scaffolded"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionDescription {
    /// Action ID; sanitized by final validation
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Parameter>,
    #[serde(default)]
    pub options: Vec<Parameter>,
    pub runtime: RuntimeSpec,
    /// One of [`WORKING_DIRECTORIES`], empty for the host default
    #[serde(default)]
    pub working_directory: String,
    /// Only consulted for container runtimes
    #[serde(default)]
    pub container_preset: ContainerPreset,
}

impl ActionDescription {
    /// Empty description seeded with caller-supplied defaults
    pub fn new(id: impl Into<String>, title: impl Into<String>, runtime: RuntimeType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            runtime: RuntimeSpec::new(runtime),
            ..Default::default()
        }
    }

    pub fn with_preset(mut self, preset: ContainerPreset) -> Self {
        self.container_preset = preset;
        self
    }

    pub fn with_working_directory(mut self, wd: impl Into<String>) -> Self {
        self.working_directory = wd.into();
        self
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime.runtime_type
    }

    pub fn is_container(&self) -> bool {
        self.runtime.runtime_type == RuntimeType::Container
    }

    pub fn params(&self, kind: ParamKind) -> &[Parameter] {
        match kind {
            ParamKind::Argument => &self.arguments,
            ParamKind::Option => &self.options,
        }
    }

    pub fn params_mut(&mut self, kind: ParamKind) -> &mut Vec<Parameter> {
        match kind {
            ParamKind::Argument => &mut self.arguments,
            ParamKind::Option => &mut self.options,
        }
    }
}
