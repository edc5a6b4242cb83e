//! CLI command implementations.

pub mod examples;
pub mod graph;
pub mod reconcile;
pub mod validate;

use std::path::{Path, PathBuf};

use colored::Colorize;
use mixs_reconcile::{
    BuiltGraph, DirectorySource, MixsSchema, ReconcileConfig, Reconciler, Report,
};

use crate::cli::OutputFormat;

type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load the configuration file, or the defaults.
pub fn load_config(path: Option<PathBuf>) -> CommandResult<ReconcileConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file not found: {}", path.display()).into());
            }
            Ok(ReconcileConfig::load(&path)?)
        }
        None => Ok(ReconcileConfig::default()),
    }
}

/// Build the merged graph, or read it from `cache`, reporting skipped sources.
pub fn build_graph(
    reconciler: &Reconciler,
    sources: &Path,
    schema: &MixsSchema,
    cache: Option<&Path>,
) -> CommandResult<BuiltGraph> {
    if !sources.is_dir() {
        return Err(format!("Sources directory not found: {}", sources.display()).into());
    }
    let provider = DirectorySource::new(sources);
    let built = match cache {
        Some(cache) => reconciler.load_or_build(&provider, schema, cache)?,
        None => reconciler.build_graph(&provider, schema)?,
    };

    if built.from_cache {
        println!(
            "{} {} ({} triples)",
            "Using cached graph".cyan().bold(),
            cache.map(|p| p.display().to_string()).unwrap_or_default().white(),
            built.graph.len()
        );
    } else {
        println!(
            "Loaded {} sources into {} triples",
            built.sources.len().to_string().white().bold(),
            built.graph.len().to_string().white().bold()
        );
    }
    for skipped in &built.skipped {
        println!("{} {}", "Skipped:".yellow().bold(), skipped);
    }
    for source in built.sources.iter().filter(|s| !s.rejected.is_empty()) {
        println!(
            "{} {} {}: {} rejected triples",
            "Partial:".yellow().bold(),
            source.kind,
            source.id,
            source.rejected.len()
        );
    }
    Ok(built)
}

/// Render a report in the chosen format.
pub fn render(report: &Report, format: OutputFormat, width: Option<usize>) -> CommandResult<String> {
    Ok(match format {
        OutputFormat::Table => report.to_markdown(width),
        OutputFormat::Tsv => report.to_tsv_string()?,
        OutputFormat::Json => report.to_json()?,
    })
}

/// Print a report under its title.
pub fn print_report(report: &Report, format: OutputFormat, width: Option<usize>) -> CommandResult {
    if let OutputFormat::Table = format {
        println!();
        println!("{} ({})", report.title.yellow().bold(), report.len());
    }
    print!("{}", render(report, format, width)?);
    if let OutputFormat::Json = format {
        println!();
    }
    Ok(())
}

/// File name for a report: lower-case title words joined by underscores.
pub fn report_file_name(report: &Report, format: OutputFormat) -> String {
    let stem: Vec<String> = report
        .title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    format!("{}.{}", stem.join("_"), format.extension())
}
