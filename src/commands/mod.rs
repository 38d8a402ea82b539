//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule.

pub mod list;
pub mod new;

pub use list::{execute_list, ListOptions};
pub use new::{execute_new, output_root, NewOptions};
