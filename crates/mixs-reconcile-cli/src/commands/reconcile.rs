//! Reconcile command - report terms missing between vocabularies.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use mixs_reconcile::{MixsSchema, Reconciler};

use crate::cli::OutputFormat;

use super::{build_graph, load_config, print_report, render, report_file_name};

pub fn run(
    sources: PathBuf,
    schema: PathBuf,
    cache: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let width = config.report_cell_width;
    let reconciler = Reconciler::with_config(config);

    println!(
        "{} {} against {}",
        "Reconciling".cyan().bold(),
        sources.display().to_string().white(),
        schema.display().to_string().white()
    );

    let schema = MixsSchema::load(&schema)?;
    let built = build_graph(&reconciler, &sources, &schema, cache.as_deref())?;

    if verbose {
        for source in &built.sources {
            println!(
                "  {:5} {:24} {:>8} triples  {}",
                source.kind.label(),
                source.id,
                source.triples,
                source.hash.dimmed()
            );
        }
    }

    let result = reconciler.reconcile(&built.graph);
    let reports: Vec<_> = result.reports().iter().map(|r| r.to_report()).collect();

    match output {
        Some(dir) => {
            fs::create_dir_all(&dir)?;
            for report in &reports {
                let path = dir.join(report_file_name(report, format));
                fs::write(&path, render(report, format, width)?)?;
                println!(
                    "{} {} ({} rows)",
                    "Wrote".green().bold(),
                    path.display().to_string().white(),
                    report.len()
                );
            }
        }
        None => {
            for report in &reports {
                print_report(report, format, width)?;
            }
        }
    }

    println!();
    if result.total() == 0 {
        println!("{}", "All vocabularies agree.".green());
    } else {
        println!(
            "Found {} mismatches ({} NCBI, {} ENA, {} MIxS)",
            result.total().to_string().white().bold(),
            result.ncbi_vs_mixs.len().to_string().red(),
            result.ena_vs_mixs.len().to_string().red(),
            result.mixs_vs_insdc.len().to_string().red()
        );
    }

    Ok(())
}
