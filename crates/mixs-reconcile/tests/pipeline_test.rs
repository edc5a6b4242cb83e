//! End-to-end tests for source loading, graph persistence and reconciliation.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use mixs_reconcile::graph::ntriples;
use mixs_reconcile::{
    DirectorySource, MixsSchema, ReconcileConfig, ReconcileError, Reconciler, SourceKind,
};

const SCHEMA: &str = r#"
id: https://w3id.org/mixs
name: mixs
settings:
  float: "[-+]?[0-9]*\\.?[0-9]+"
  unit: "\\S+"
classes:
  QuantityValue:
    description: A simple quantity
  Soil:
    slot_usage:
      depth:
        examples:
          - value: 0.5 m
slots:
  depth:
    title: depth
    range: QuantityValue
    pattern: "^[-+]?[0-9]*\\.?[0-9]+ \\S+$"
    string_serialization: "{float} {unit}"
    examples:
      - value: 10 meter
  elev:
    title: elevation
    range: float
    string_serialization: "{float} {unit}"
  samp_store_temp:
    title: sample storage temperature
    string_serialization: "{float} {text}"
"#;

fn write_json(path: &Path, value: &serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Lay out `<root>/ena/ERC000011.json` (with an empty `<TEXT_FIELD/>` element),
/// a broken `ERC000012.json` and the NCBI list.
fn create_sources() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(
        &dir.path().join("ena").join("ERC000011.json"),
        &json!({
            "CHECKLIST_SET": {
                "CHECKLIST": {
                    "@accession": "ERC000011",
                    "DESCRIPTOR": {
                        "LABEL": "ENA default sample checklist",
                        "FIELD_GROUP": [
                            {"NAME": "Collection event information", "FIELD": [
                                {"LABEL": "elevation", "NAME": "elevation", "UNITS": {"UNIT": "m"}},
                                {
                                    "LABEL": "sample collection device",
                                    "NAME": "sample collection device",
                                    "FIELD_TYPE": {"TEXT_FIELD": null}
                                }
                            ]}
                        ]
                    }
                }
            }
        }),
    );
    fs::write(dir.path().join("ena").join("ERC000012.json"), "{not json").unwrap();
    write_json(
        &dir.path().join("ncbi").join("biosample_attributes.json"),
        &json!({
            "BioSampleAttributes": {
                "Attribute": [
                    {"Name": "depth", "HarmonizedName": "depth", "Format": {"@type": "text"}},
                    {"Name": "host subject id", "HarmonizedName": "host_subject_id"}
                ]
            }
        }),
    );
    dir
}

fn reconciler() -> Reconciler {
    let config = ReconcileConfig::default().with_ena_checklists(["ERC000011", "ERC000012", "ERC000013"]);
    Reconciler::with_config(config)
}

// =============================================================================
// Source Loading Tests
// =============================================================================

#[test]
fn test_directory_sources_skip_broken_and_missing() {
    let dir = create_sources();
    let outcome = reconciler().load_sources(&DirectorySource::new(dir.path()));

    assert_eq!(outcome.graphs.len(), 2);
    let skipped: Vec<&str> = outcome.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, vec!["ERC000012", "ERC000013"]);
    assert!(outcome.skipped.iter().all(|s| s.kind == SourceKind::Ena));

    let ncbi = outcome.sources.iter().find(|s| s.kind == SourceKind::Ncbi).unwrap();
    assert_eq!(ncbi.subject, "http://example.com/resource/ncbi/biosample_attributes");
    assert!(ncbi.triples > 0);
    assert!(ncbi.rejected.is_empty());
}

#[test]
fn test_null_leaf_keeps_rest_of_checklist() {
    let dir = create_sources();
    let reconciler = reconciler();
    let built = reconciler
        .build_graph(&DirectorySource::new(dir.path()), &MixsSchema::from_yaml_str(SCHEMA).unwrap())
        .unwrap();

    let ena = built.sources.iter().find(|s| s.id == "ERC000011").unwrap();
    assert_eq!(ena.rejected.len(), 1);
    assert!(ena.rejected[0].contains("text_field"));
    assert!(built.skipped.iter().all(|s| s.id != "ERC000011"));

    let result = reconciler.reconcile(&built.graph);
    assert!(result.ena_vs_mixs.reports("sample collection device"));
    assert!(!result.ena_vs_mixs.reports("elevation"));
}

#[test]
fn test_invalid_mint_base_skips_sources_instead_of_losing_triples() {
    let dir = create_sources();
    let config = ReconcileConfig {
        mint_base: "http://example.com/<x>/".to_string(),
        ..ReconcileConfig::default().with_ena_checklists(["ERC000011"])
    };
    assert!(config.check().is_err());

    let outcome = Reconciler::with_config(config).load_sources(&DirectorySource::new(dir.path()));
    assert!(outcome.graphs.is_empty());
    assert_eq!(outcome.skipped.len(), 2);
    assert!(outcome.skipped.iter().all(|s| s.reason.contains("Malformed triple")));
}

#[test]
fn test_source_graphs_never_share_minted_nodes() {
    let dir = create_sources();
    let outcome = reconciler().load_sources(&DirectorySource::new(dir.path()));

    let minted = |i: usize| -> std::collections::HashSet<String> {
        outcome.graphs[i]
            .graph()
            .iter()
            .flat_map(|t| [t.subject(), t.object()])
            .filter_map(|n| n.as_iri())
            .filter(|iri| iri.starts_with("http://example.com/uuid/"))
            .map(str::to_string)
            .collect()
    };
    let (a, b) = (minted(0), minted(1));
    assert!(!a.is_empty() && !b.is_empty());
    assert!(a.is_disjoint(&b));
}

// =============================================================================
// Reconciliation Tests
// =============================================================================

#[test]
fn test_reconcile_from_directory() {
    let dir = create_sources();
    let schema = MixsSchema::from_yaml_str(SCHEMA).unwrap();
    let reconciler = reconciler();
    let built = reconciler.build_graph(&DirectorySource::new(dir.path()), &schema).unwrap();
    let result = reconciler.reconcile(&built.graph);

    assert!(!result.ncbi_vs_mixs.reports("depth"));
    assert!(result.ncbi_vs_mixs.reports("host_subject_id"));

    assert!(!result.ena_vs_mixs.reports("elevation"));
    assert!(result.ena_vs_mixs.reports("sample collection device"));

    // depth is an object property and never part of the MIxS query.
    assert!(!result.mixs_vs_insdc.reports("depth"));
    assert!(result.mixs_vs_insdc.reports("elev"));
    assert!(result.mixs_vs_insdc.reports("samp_store_temp"));
}

#[test]
fn test_mismatch_reports_render() {
    let dir = create_sources();
    let schema = MixsSchema::from_yaml_str(SCHEMA).unwrap();
    let reconciler = reconciler();
    let built = reconciler.build_graph(&DirectorySource::new(dir.path()), &schema).unwrap();
    let report = reconciler.reconcile(&built.graph).ncbi_vs_mixs.to_report();

    let md = report.to_markdown(Some(50));
    assert!(md.contains("host_subject_id"));
    let tsv = report.to_tsv_string().unwrap();
    assert!(tsv.starts_with("ncbi_harmonized_name\tncbi_name\n"));
}

#[test]
fn test_example_overview_from_merged_graph() {
    let dir = create_sources();
    let schema = MixsSchema::from_yaml_str(SCHEMA).unwrap();
    let reconciler = reconciler();
    let built = reconciler.build_graph(&DirectorySource::new(dir.path()), &schema).unwrap();
    let report = reconciler.example_overview(&built.graph);

    assert!(report.rows.contains(&vec![
        "depth".to_string(),
        "10 meter".to_string(),
        "{float} {unit}".to_string()
    ]));
    assert!(report.rows.contains(&vec![String::new(), String::new(), "{float} {text}".to_string()]));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_cache_round_trip() {
    let dir = create_sources();
    let schema = MixsSchema::from_yaml_str(SCHEMA).unwrap();
    let cache = dir.path().join("rdf").join("combined.nt");
    let reconciler = reconciler();

    let built = reconciler.load_or_build(&DirectorySource::new(dir.path()), &schema, &cache).unwrap();
    let reloaded = ntriples::load(&cache).unwrap();
    assert_eq!(reloaded, built.graph);

    let cached = reconciler.load_or_build(&DirectorySource::new(dir.path()), &schema, &cache).unwrap();
    assert!(cached.from_cache);
    assert_eq!(
        reconciler.reconcile(&cached.graph).ncbi_vs_mixs,
        reconciler.reconcile(&built.graph).ncbi_vs_mixs
    );
}

#[test]
fn test_cache_with_anonymous_nodes_is_rejected() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("bad.nt");
    fs::write(&cache, "_:b0 <http://example.com/name> \"x\" .\n").unwrap();
    let err = ntriples::load(&cache).unwrap_err();
    assert!(matches!(err, ReconcileError::AnonymousNode(_)));
}

#[test]
fn test_corrupt_cache_reports_line() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("bad.nt");
    fs::write(&cache, "<http://a> <http://b> <http://c> .\n<http://a> <http://b>\n").unwrap();
    match ntriples::load(&cache).unwrap_err() {
        ReconcileError::GraphParse { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_schema_is_fatal() {
    let err = MixsSchema::load("/nonexistent/mixs.yaml").unwrap_err();
    assert!(matches!(err, ReconcileError::SchemaLoad(_)));
}
