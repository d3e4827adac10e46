//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, init::InitArgs, plan::PlanArgs,
    sync::SyncArgs, tables::TableCommands, verdict::VerdictArgs,
};

#[derive(Parser)]
#[command(name = "tsp")]
#[command(author, version, about = "Tessera Sampling Plans")]
#[command(long_about = "Single sampling plans for lot acceptance inspection (ISO 2859-1 / ANSI-ASQ Z1.4).")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new TSP project
    Init(InitArgs),

    /// Derive the sampling plan for a lot
    Plan(PlanArgs),

    /// Decide a lot from the defects found in its sample
    Verdict(VerdictArgs),

    /// Update an inspection context file and keep its plan in sync
    Sync(SyncArgs),

    /// Print the lookup tables
    #[command(subcommand)]
    Table(TableCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output for the terminal
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown document
    Md,
}
