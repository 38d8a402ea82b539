#![forbid(unsafe_code)]
//! Action Scaffold Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use scaffold::commands::{execute_list, execute_new, ListOptions, NewOptions};
use scaffold::{Config, ContainerPreset, ErrorKind, RuntimeType, ScaffoldError};

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Scaffold new actions from a layered template library")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = scaffold::config::CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new action
    New {
        /// Directory holding actions/ and plugins/
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Runtime (plugin, container, shell)
        #[arg(short, long)]
        runtime: Option<RuntimeType>,

        /// Action ID (sanitized before use)
        #[arg(long)]
        id: Option<String>,

        /// Action title
        #[arg(long)]
        title: Option<String>,

        /// Container preset (go, py, sh)
        #[arg(short, long)]
        preset: Option<ContainerPreset>,

        /// Template directory replacing the built-in library
        #[arg(long, env = "SCAFFOLD_TEMPLATES")]
        templates: Option<PathBuf>,

        /// Skip interactive prompts (use defaults + CLI args)
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List existing actions
    List {
        /// Directory holding actions/ and plugins/
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load_if_exists(&cli.config)?;

    let result = match cli.command {
        Commands::New {
            output,
            runtime,
            id,
            title,
            preset,
            templates,
            yes,
        } => {
            let options = NewOptions {
                output,
                runtime,
                preset,
                id,
                title,
                templates,
                yes,
            };
            execute_new(options, &config).map(|_| ())
        }

        Commands::List { output, json } => execute_list(ListOptions { output, json }, &config),
    };

    // Cancellation and bad input get a short message instead of the error chain
    if let Some(err) = result.as_ref().err().and_then(|e| e.downcast_ref::<ScaffoldError>()) {
        match err.kind() {
            ErrorKind::Cancelled => {
                eprintln!("{} Aborted", style("✗").red());
                std::process::exit(130);
            }
            ErrorKind::Validation => {
                eprintln!("{} {}", style("✗").red(), err);
                std::process::exit(2);
            }
            _ => {}
        }
    }

    result
}
