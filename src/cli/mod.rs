use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "polyglot-depgraph",
    version,
    about = "File-level dependency graphs for mixed-language projects",
    long_about = "Scan a project tree, extract imports/includes/uses for TypeScript, JavaScript, Python, Java, C#, C/C++, Go and Rust, resolve them to project files and report the dependency graph with detected cycles. Directories such as node_modules, .git, dist and build are never scanned."
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Dependencies,
    Dependents,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    In,
    Out,
    Total,
}

/// Where a command gets its graph from.
#[derive(Debug, Clone, clap::Args)]
pub struct GraphSource {
    /// Project root to scan
    #[arg(short, long, default_value = ".", env = "DEPGRAPH_PATH")]
    pub path: PathBuf,
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Optional path to a saved graph JSON (skips the scan)
    #[arg(long)]
    pub graph: Option<PathBuf>,
    /// Run extraction on a single thread
    #[arg(long, default_value_t = false)]
    pub no_parallel: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a project and build its dependency graph
    Scan {
        #[command(flatten)]
        source: GraphSource,
        /// Write the graph as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the graph summary
    Summary {
        #[command(flatten)]
        source: GraphSource,
        /// Output format: text or json
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Run queries over the dependency graph
    Query {
        #[command(subcommand)]
        query: QueryCommands,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum QueryCommands {
    /// List detected dependency cycles
    Cycles {
        #[command(flatten)]
        source: GraphSource,
        /// Output format: text or json
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List files directly connected to a file
    Connected {
        #[command(flatten)]
        source: GraphSource,
        /// Project-relative path of the file
        #[arg(long)]
        file: String,
        /// Follow dependencies, dependents or both
        #[arg(long, value_enum, default_value_t = DirectionArg::Both)]
        direction: DirectionArg,
        /// Output format: text or json
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List top-N hub files by degree
    Hubs {
        #[command(flatten)]
        source: GraphSource,
        /// Metric: in, out, total
        #[arg(long, value_enum, default_value_t = MetricArg::Total)]
        metric: MetricArg,
        /// Top N results
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Output format: text or json
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Compute shortest dependency path between two files
    Path {
        #[command(flatten)]
        source: GraphSource,
        /// Source file (project-relative)
        #[arg(long)]
        from: String,
        /// Destination file (project-relative)
        #[arg(long)]
        to: String,
        /// Output format: text or json
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
