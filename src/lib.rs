#![forbid(unsafe_code)]

//! @acp:module "Scaffold Library"
//! @acp:summary "Layered template resolution and rendering for new actions"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # Action Scaffold
//!
//! Turns a short description of an action into a directory holding its
//! `action.yaml` definition plus the supporting files for its runtime.
//!
//! ## Features
//!
//! - **Wizard**: declarative question steps over a pluggable form engine
//! - **Layered templates**: runtime base files overlaid by container presets
//! - **All-or-nothing**: a failed generation removes the directory it created
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashSet;
//! use scaffold::{embedded, ActionDescription, Generator, MetadataCollector, RuntimeType};
//!
//! fn main() -> anyhow::Result<()> {
//!     let existing: HashSet<String> = HashSet::new();
//!     let values = MetadataCollector::new(&existing)
//!         .collect(ActionDescription::new("hello", "Hello", RuntimeType::Shell), None)?;
//!
//!     let store = embedded::builtin();
//!     let dir = Generator::new("actions", &store).generate(&values)?;
//!     println!("{}", dir.display());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod templates;
pub mod validate;

// Re-exports
pub use config::Config;
pub use error::{ErrorKind, Result, ScaffoldError};
pub use generator::{DirectoryManager, Generator, RollbackGuard, RollbackOutcome};
pub use metadata::{
    Answer, Field, FieldValidator, FormEngine, MetadataCollector, ScriptedForm, TerminalForm,
};
pub use model::{
    ActionDescription, ContainerConfig, ContainerPreset, ParamKind, ParamType, Parameter,
    RuntimeSpec, RuntimeType, ShellConfig,
};
pub use registry::{ActionRegistry, DirectoryRegistry, DiscoveredAction};
pub use templates::{embedded, DirStore, MemoryStore, TemplateResolver, TemplateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
