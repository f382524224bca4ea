//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// sfm - apply and inspect the storefront database schema
#[derive(Parser, Debug)]
#[command(name = "sfm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: ./storefront.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path from config
    #[arg(short, long, global = true, env = "SFM_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the migration catalog in-process
    Migrate(MigrateArgs),

    /// Apply the migration catalog through an external database CLI
    External(ExternalArgs),

    /// Report whether the baseline schema is in place
    Status,

    /// List catalog units in application order
    List,

    /// Print one catalog unit's SQL
    Show(ShowArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the external command
#[derive(Args, Debug)]
pub struct ExternalArgs {
    /// Command template containing {sql}; overrides external.command
    #[arg(long)]
    pub command: Option<String>,

    /// Print each command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Unit name, e.g. 0003_carts
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
