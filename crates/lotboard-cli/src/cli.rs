use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::common::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// Configuration file (defaults to ~/.lotboard/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Scenario store file (overrides the configured store path)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Feed locations and filter overrides shared by the board commands.
#[derive(Args, Debug, Clone)]
pub struct BoardArgs {
    /// Project feed (JSON array or CSV with header row)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub projects: PathBuf,

    /// Requirement feed (JSON array or CSV with header row)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub requirements: PathBuf,

    /// Grid filter; "all" clears the configured default
    #[arg(long)]
    pub grid: Option<String>,

    /// Subtype filter; "all" clears the configured default
    #[arg(long)]
    pub subtype: Option<String>,

    /// Only show these parent companies (repeatable)
    #[arg(long = "company")]
    pub companies: Vec<String>,

    /// Apply a saved scenario before reporting
    #[arg(long)]
    pub load: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the allocation and list each project's status and display order
    Allocate {
        #[command(flatten)]
        board: BoardArgs,
        /// Report per-group outcomes instead of projects
        #[arg(long)]
        groups: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Per-year requirement, capacity and remaining totals
    Summary {
        #[command(flatten)]
        board: BoardArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Dispatch a JSON script of board commands, then report totals
    Apply {
        #[command(flatten)]
        board: BoardArgs,
        /// JSON array of commands, e.g. [{"command": "toggle_highlight"}]
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Save the resulting board as a scenario
        #[arg(long)]
        save: Option<String>,
        /// Replace an existing scenario of the same name
        #[arg(long, requires = "save")]
        overwrite: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Saved scenario management
    Scenarios {
        #[command(subcommand)]
        command: ScenariosCommands,
    },
    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScenariosCommands {
    /// List saved scenarios
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the entries of one scenario
    Show {
        name: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Delete a scenario
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Target path (defaults to ~/.lotboard/config.toml)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Show,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
