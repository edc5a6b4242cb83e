//! Validate command - check slot examples and serialization templates.

use std::path::{Path, PathBuf};

use colored::Colorize;
use mixs_reconcile::{FindingKind, MixsSchema, Reconciler, Severity};

use crate::cli::OutputFormat;

use super::{load_config, print_report};

pub fn run(
    schema_path: PathBuf,
    append_examples: bool,
    write: Option<Option<PathBuf>>,
    format: OutputFormat,
    failures_only: bool,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let width = config.report_cell_width;
    let reconciler = Reconciler::with_config(config);

    println!(
        "{} {}",
        "Validating".cyan().bold(),
        schema_path.display().to_string().white()
    );

    let mut schema = MixsSchema::load(&schema_path)?;
    let report = reconciler.validate_schema(&mut schema, append_examples);

    if append_examples {
        println!(
            "Appended {} slot usage examples",
            report.examples_appended.to_string().white().bold()
        );
    }

    print_report(&report.to_report(failures_only), format, width)?;

    println!();
    println!(
        "Checked {} slots: {} pattern matches, {} mismatches, {} invalid patterns, {} expanded templates, {} unresolved placeholders",
        report.slots.to_string().white().bold(),
        report.count(FindingKind::PatternMatch).to_string().green(),
        report.count(FindingKind::PatternMismatch).to_string().red(),
        report.count(FindingKind::InvalidPattern).to_string().yellow(),
        report.count(FindingKind::TemplateExpanded).to_string().green(),
        report.count(FindingKind::UnresolvedPlaceholder).to_string().red()
    );

    if let Some(target) = write {
        let path = target.unwrap_or_else(|| temp_schema_path(&schema_path));
        schema.save(&path)?;
        println!(
            "{} {}",
            "Saved schema to".green().bold(),
            path.display().to_string().white()
        );
    }

    if report.count_severity(Severity::Error) == 0 {
        println!("{}", "No errors found.".green());
    }

    Ok(())
}

/// `<dir>/<stem>.temp.yaml` next to the input schema.
fn temp_schema_path(schema: &Path) -> PathBuf {
    let stem = schema.file_stem().unwrap_or_default().to_string_lossy();
    schema.with_file_name(format!("{}.temp.yaml", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_schema_path() {
        assert_eq!(
            temp_schema_path(Path::new("src/mixs/schema/mixs.yaml")),
            PathBuf::from("src/mixs/schema/mixs.temp.yaml")
        );
    }
}
