//! @acp:module "List Command"
//! @acp:summary "List the actions below an output root"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::registry::DirectoryRegistry;

/// Options for the list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub output: Option<PathBuf>,
    /// Print JSON instead of a table
    pub json: bool,
}

/// Execute the list command
pub fn execute_list(options: ListOptions, config: &Config) -> Result<()> {
    let output = options.output.unwrap_or_else(|| config.output.clone());
    let actions = DirectoryRegistry::new(&output).discover()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    if actions.is_empty() {
        println!(
            "{} No actions found below {}",
            style("⚠").yellow(),
            output.display()
        );
        return Ok(());
    }

    println!(
        "{} {} action(s) below {}",
        style("→").blue(),
        actions.len(),
        style(output.display()).cyan()
    );
    for action in &actions {
        let runtime = action
            .runtime
            .map(|rt| rt.as_str())
            .unwrap_or("?");
        println!(
            "  {:<24} {:<10} {}",
            style(&action.id).cyan(),
            style(runtime).dim(),
            action.title.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
