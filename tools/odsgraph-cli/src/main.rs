//! odsgraph Command Line Interface
//!
//! Inspects the base model and exercises the model cache end to end.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::Directive;

use crate::commands::{base_model, demo};
use crate::error::{CliError, Result};

/// odsgraph Command Line Interface
///
/// An in-memory application model cache for engineering measurement data.
#[derive(Parser, Debug)]
#[command(name = "odsgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the base elements, or the base attributes of one element
    BaseModel {
        /// Base element name (case-insensitive)
        element: Option<String>,
    },

    /// Build a sample test hierarchy and print its instances and edges
    Demo,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::BaseModel { element } => base_model::run(element.as_deref(), cli.format),
        Commands::Demo => demo::run(cli.format),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let directive = format!("odsgraph_cache={level}")
        .parse::<Directive>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
