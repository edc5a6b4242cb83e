//! Ingestion, canonicalization and matching benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use mixs_reconcile::schema::{MixsSchema, SlotDefinition, ValidationReport};
use mixs_reconcile::{MemorySource, ReconcileConfig, Reconciler, SourceKind};

/// ENA checklist with `fields` fields.
fn checklist(fields: usize) -> Value {
    let fields: Vec<Value> = (0..fields)
        .map(|i| json!({"NAME": format!("field {}", i), "LABEL": format!("field {}", i), "MANDATORY": "optional"}))
        .collect();
    json!({"CHECKLIST": {"DESCRIPTOR": {"FIELD_GROUP": {"FIELD": fields}}}})
}

/// NCBI attribute list with `attributes` attributes.
fn attributes(attributes: usize) -> Value {
    let attributes: Vec<Value> = (0..attributes)
        .map(|i| json!({"Name": format!("attribute {}", i), "HarmonizedName": format!("slot_{}", i)}))
        .collect();
    json!({"BioSampleAttributes": {"Attribute": attributes}})
}

fn schema(slots: usize) -> MixsSchema {
    (0..slots).fold(
        MixsSchema::default().with_setting("float", r"[+-]?[0-9]*\.?[0-9]+"),
        |schema, i| {
            schema.with_slot(
                SlotDefinition::new(format!("slot_{}", i))
                    .with_title(format!("field {}", i * 2))
                    .with_pattern(r"^[0-9]+ \S+$")
                    .with_string_serialization("{float} {unit}")
                    .with_examples([format!("{} meter", i), format!("about {}", i)]),
            )
        },
    )
}

fn bench_build_and_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_and_reconcile");

    for size in [50, 200, 1000].iter() {
        let provider = MemorySource::new()
            .with_document(SourceKind::Ena, "ERC000011", checklist(*size))
            .with_document(SourceKind::Ncbi, "biosample_attributes", attributes(*size));
        let schema = schema(*size);
        let reconciler = Reconciler::with_config(ReconcileConfig::default().with_ena_checklists(["ERC000011"]));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("terms", size), size, |b, _| {
            b.iter(|| {
                let built = reconciler.build_graph(&provider, &schema).unwrap();
                black_box(reconciler.reconcile(&built.graph))
            })
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_schema");

    for size in [100, 1000].iter() {
        let schema = schema(*size);
        group.bench_with_input(BenchmarkId::new("slots", size), &schema, |b, schema| {
            b.iter(|| black_box(ValidationReport::run(schema)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_and_reconcile, bench_validate);
criterion_main!(benches);
