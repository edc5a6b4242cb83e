//! Examples command - list slot examples and serializations.

use std::path::PathBuf;

use colored::Colorize;
use mixs_reconcile::{MixsSchema, Reconciler};

use crate::cli::OutputFormat;

use super::{build_graph, load_config, print_report};

pub fn run(
    sources: PathBuf,
    schema: PathBuf,
    cache: Option<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let width = config.report_cell_width;
    let reconciler = Reconciler::with_config(config);

    println!(
        "{} {}",
        "Collecting examples from".cyan().bold(),
        schema.display().to_string().white()
    );

    let schema = MixsSchema::load(&schema)?;
    let built = build_graph(&reconciler, &sources, &schema, cache.as_deref())?;
    let report = reconciler.example_overview(&built.graph);
    print_report(&report, format, width)?;

    Ok(())
}
