//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// zonegraph - table-to-table lineage from data-flow metadata
#[derive(Parser, Debug)]
#[command(name = "zg")]
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
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (holds zonegraph.yml; relative config paths resolve against it)
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Metadata catalog API root (overrides catalog.url)
    #[arg(long, global = true, env = "ATLAS_URL")]
    pub atlas_url: Option<String>,

    /// Metadata catalog user
    #[arg(long, global = true, env = "ATLAS_USERNAME")]
    pub atlas_username: Option<String>,

    /// Metadata catalog password
    #[arg(long, global = true, env = "ATLAS_PASSWORD", hide_env_values = true)]
    pub atlas_password: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract lineage for every term and persist or plan it
    Run(RunArgs),

    /// Extract lineage from a single term JSON file and print it
    Extract(ExtractArgs),

    /// List the terms a run would process
    Terms(TermsArgs),

    /// Delete every node and edge from the graph store
    Wipe(WipeArgs),
}

/// Graph store selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// DuckDB property graph at graph.path
    Duckdb,
    /// Cypher MERGE script at graph.cypher_script
    Cypher,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Write the lineage plan CSV instead of persisting
    #[arg(long)]
    pub plan_only: bool,

    /// Graph store to persist into
    #[arg(long, value_enum, default_value = "duckdb")]
    pub sink: SinkKind,

    /// Only process these terms (comma-separated)
    #[arg(short, long)]
    pub terms: Option<String>,

    /// Override the plan CSV path
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Output formats for extract
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractFormat {
    /// One line per edge and failure
    Text,
    /// JSON object with edges and failures
    Json,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Term JSON file (catalog or mirror shape)
    pub file: String,

    /// Term id to attribute edges to (default: file stem)
    #[arg(long)]
    pub term: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ExtractFormat,
}

/// Arguments for the terms command
#[derive(Args, Debug)]
pub struct TermsArgs {
    /// Only print the number of terms
    #[arg(long)]
    pub count: bool,
}

/// Arguments for the wipe command
#[derive(Args, Debug)]
pub struct WipeArgs {
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,

    /// Graph store to wipe
    #[arg(long, value_enum, default_value = "duckdb")]
    pub sink: SinkKind,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
