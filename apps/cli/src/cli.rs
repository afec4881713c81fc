use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a query and print every matching document as a table
    Search(SearchArgs),
    /// Print the cluster's version and the scroll protocol used for it
    Version {
        /// Cluster address, e.g. http://localhost:9200 (defaults to `host` in config.toml)
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Cluster address, e.g. http://localhost:9200 (defaults to `host` in config.toml)
    #[arg(long)]
    pub host: Option<String>,

    /// Index to query
    #[arg(short, long)]
    pub index: String,

    /// Document type, for clusters that still have them
    #[arg(long)]
    pub doc_type: Option<String>,

    /// Query body as JSON
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,

    /// Read the query body from a file
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// Hits per page
    #[arg(long)]
    pub size: Option<usize>,

    /// Return at most this many documents
    #[arg(long)]
    pub max_hits: Option<usize>,

    /// Scroll context lifetime, e.g. 5m
    #[arg(long)]
    pub scroll: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Release the scroll context once all pages are read
    #[arg(long)]
    pub clear_scroll: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// A JSON array of records
    Json,
    /// One JSON record per line
    Ndjson,
}
