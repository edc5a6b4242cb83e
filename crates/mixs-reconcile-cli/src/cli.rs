//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mixs-reconcile: reconcile INSDC vocabularies with MIxS and validate MIxS examples
#[derive(Parser)]
#[command(name = "mixs-reconcile")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (namespaces, checklists, null policy)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report terms missing between the NCBI, ENA and MIxS vocabularies
    Reconcile {
        /// Directory with ena/<checklist>.json and ncbi/<document>.json
        #[arg(short, long)]
        sources: PathBuf,

        /// MIxS LinkML schema (YAML)
        #[arg(long)]
        schema: PathBuf,

        /// Merged graph cache; read if present, written otherwise
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Write one file per report into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check slot examples against patterns and expand serialization templates
    Validate {
        /// MIxS LinkML schema (YAML)
        #[arg(long)]
        schema: PathBuf,

        /// Append class slot-usage examples to the slots before validating
        #[arg(long)]
        append_examples: bool,

        /// Write the schema back (default: <schema>.temp.yaml)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        write: Option<Option<PathBuf>>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Show only mismatches, unresolved placeholders and invalid patterns
        #[arg(long)]
        failures_only: bool,
    },

    /// Build the merged graph and write it to a file
    Graph {
        /// Directory with ena/<checklist>.json and ncbi/<document>.json
        #[arg(short, long)]
        sources: PathBuf,

        /// MIxS LinkML schema (YAML)
        #[arg(long)]
        schema: PathBuf,

        /// Output path for the graph
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the examples and serializations of every schema slot
    Examples {
        /// Directory with ena/<checklist>.json and ncbi/<document>.json
        #[arg(short, long)]
        sources: PathBuf,

        /// MIxS LinkML schema (YAML)
        #[arg(long)]
        schema: PathBuf,

        /// Merged graph cache; read if present, written otherwise
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

impl OutputFormat {
    /// File extension for reports written in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "md",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "markdown" | "md" => Ok(OutputFormat::Table),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, tsv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
