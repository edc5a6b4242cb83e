//! Graph command - build the merged graph and save it.

use std::path::PathBuf;

use colored::Colorize;
use mixs_reconcile::graph::ntriples;
use mixs_reconcile::{MixsSchema, Reconciler};

use super::{build_graph, load_config};

pub fn run(
    sources: PathBuf,
    schema: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = Reconciler::with_config(load_config(config)?);

    println!(
        "{} {}",
        "Building graph from".cyan().bold(),
        sources.display().to_string().white()
    );

    let schema = MixsSchema::load(&schema)?;
    let built = build_graph(&reconciler, &sources, &schema, None)?;
    ntriples::save(&built.graph, &output)?;

    println!(
        "{} {} ({} triples)",
        "Saved to".green().bold(),
        output.display().to_string().white(),
        built.graph.len()
    );

    Ok(())
}
