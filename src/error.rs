//! @acp:module "Errors"
//! @acp:summary "Error types for validation, template resolution and rendering"
//! @acp:domain cli
//! @acp:layer model

use std::path::PathBuf;

use thiserror::Error;

/// Library result type
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// @acp:summary "All failures the scaffolding core can report"
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Bad identifier, empty required field, duplicate name, ID collision, bad default
    #[error("{0}")]
    Validation(String),

    /// A path requested from the template store does not exist
    #[error("template path not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to parse template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user cancelled a form step
    #[error("aborted by user")]
    Aborted,

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used by callers that only care about the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    TemplateResolution,
    Render,
    Cancelled,
    Io,
}

impl ScaffoldError {
    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        ScaffoldError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaffoldError::Validation(_) => ErrorKind::Validation,
            ScaffoldError::TemplateNotFound(_) | ScaffoldError::Template(_) => {
                ErrorKind::TemplateResolution
            }
            ScaffoldError::Render(_) | ScaffoldError::WriteFile { .. } => ErrorKind::Render,
            ScaffoldError::Aborted => ErrorKind::Cancelled,
            ScaffoldError::CreateDir { .. }
            | ScaffoldError::Prompt(_)
            | ScaffoldError::Io(_)
            | ScaffoldError::Json(_)
            | ScaffoldError::Yaml(_)
            | ScaffoldError::Other(_) => ErrorKind::Io,
        }
    }
}
