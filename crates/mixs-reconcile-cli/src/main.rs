//! mixs-reconcile CLI - vocabulary reconciliation and MIxS schema validation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("mixs_reconcile=debug,info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config;
    let result = match cli.command {
        Commands::Reconcile {
            sources,
            schema,
            cache,
            format,
            output,
        } => commands::reconcile::run(sources, schema, cache, format, output, config, cli.verbose),

        Commands::Validate {
            schema,
            append_examples,
            write,
            format,
            failures_only,
        } => commands::validate::run(schema, append_examples, write, format, failures_only, config),

        Commands::Graph {
            sources,
            schema,
            output,
        } => commands::graph::run(sources, schema, output, config),

        Commands::Examples {
            sources,
            schema,
            cache,
            format,
        } => commands::examples::run(sources, schema, cache, format, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
