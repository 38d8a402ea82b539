//! @acp:module "Templates"
//! @acp:summary "Template storage, resolution and rendering"
//! @acp:domain cli
//! @acp:layer service
//!
//! ## Overview
//!
//! - [`store`]: read-only stores the library lives in (memory, disk)
//! - [`embedded`]: the built-in library compiled into the binary
//! - [`resolver`]: picks and compiles the templates for a runtime and preset
//! - [`renderer`]: executes compiled templates into output files

pub mod embedded;
pub mod renderer;
pub mod resolver;
pub mod store;

pub use renderer::{render, CompiledTemplates};
pub use resolver::{Layer, TemplateDir, TemplateResolver, TemplateSet};
pub use store::{DirStore, MemoryStore, StoreEntry, TemplateStore};
