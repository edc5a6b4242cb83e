//! Main Reconciler struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::graph::{CanonicalGraph, Canonicalizer, Node, TripleStore, merge, ntriples};
use crate::ingest::{
    Ingestor, SkippedSource, SourceKind, SourceMetadata, SourceProvider, SourceRequest,
    content_hash,
};
use crate::report::Report;
use crate::schema::{
    MixsSchema, ValidationReport, append_examples, collect_slot_usage_examples, schema_graph,
};
use crate::vocab::{MismatchReport, VocabularyIndex, example_overview, match_all};

/// Canonical graphs of the sources that loaded, plus what was skipped.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub graphs: Vec<CanonicalGraph>,
    pub sources: Vec<SourceMetadata>,
    pub skipped: Vec<SkippedSource>,
}

/// A merged graph and where it came from.
#[derive(Debug)]
pub struct BuiltGraph {
    pub graph: CanonicalGraph,
    pub sources: Vec<SourceMetadata>,
    pub skipped: Vec<SkippedSource>,
    /// Whether the graph was read from a cache file instead of built.
    pub from_cache: bool,
}

/// Result of the three term mismatch queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// NCBI attributes without a MIxS term.
    pub ncbi_vs_mixs: MismatchReport,
    /// ENA fields without a MIxS datatype term.
    pub ena_vs_mixs: MismatchReport,
    /// MIxS datatype terms no INSDC vocabulary refers to.
    pub mixs_vs_insdc: MismatchReport,
}

impl ReconciliationResult {
    pub fn reports(&self) -> [&MismatchReport; 3] {
        [&self.ncbi_vs_mixs, &self.ena_vs_mixs, &self.mixs_vs_insdc]
    }

    /// Total mismatches across the three queries.
    pub fn total(&self) -> usize {
        self.reports().iter().map(|r| r.len()).sum()
    }
}

/// Reconciles the INSDC vocabularies against MIxS and validates the schema.
pub struct Reconciler {
    config: ReconcileConfig,
    ingestor: Ingestor,
    seed: Option<u64>,
}

impl Reconciler {
    /// Create a reconciler with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    /// Create a reconciler with a custom configuration.
    pub fn with_config(config: ReconcileConfig) -> Self {
        let ingestor = Ingestor::new(config.document_namespace.clone())
            .with_null_policy(config.null_policy);
        Self {
            config,
            ingestor,
            seed: None,
        }
    }

    /// Mint node identifiers from a seeded generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    fn canonicalizer(&self) -> Canonicalizer {
        let canonicalizer = Canonicalizer::with_base(self.config.mint_base.clone());
        match self.seed {
            Some(seed) => canonicalizer.with_seed(seed),
            None => canonicalizer,
        }
    }

    /// Every source document the configuration asks for.
    pub fn requests(&self) -> Vec<SourceRequest> {
        self.config
            .ena_checklists
            .iter()
            .map(|id| SourceRequest::new(SourceKind::Ena, id.clone()))
            .chain(std::iter::once(SourceRequest::new(
                SourceKind::Ncbi,
                self.config.ncbi_document.clone(),
            )))
            .collect()
    }

    /// Fetch, ingest and canonicalize every requested source.
    ///
    /// Sources that are absent, fail to load or fail to ingest are skipped
    /// with a warning.
    pub fn load_sources(&self, provider: &dyn SourceProvider) -> IngestOutcome {
        self.load_with(provider, &mut self.canonicalizer())
    }

    fn load_with(&self, provider: &dyn SourceProvider, canonicalizer: &mut Canonicalizer) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        for request in self.requests() {
            match self.load_one(provider, &request, canonicalizer) {
                Ok((graph, metadata)) => {
                    debug!(source = %request, triples = metadata.triples, hash = %metadata.hash, "loaded source");
                    outcome.graphs.push(graph);
                    outcome.sources.push(metadata);
                }
                Err(reason) => {
                    warn!(source = %request, "skipping source: {}", reason);
                    outcome.skipped.push(SkippedSource {
                        kind: request.kind,
                        id: request.id.clone(),
                        reason,
                    });
                }
            }
        }
        info!(
            loaded = outcome.sources.len(),
            skipped = outcome.skipped.len(),
            "loaded sources"
        );
        outcome
    }

    fn load_one(
        &self,
        provider: &dyn SourceProvider,
        request: &SourceRequest,
        canonicalizer: &mut Canonicalizer,
    ) -> std::result::Result<(CanonicalGraph, SourceMetadata), String> {
        let document = provider
            .fetch(request)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "document not found".to_string())?;
        let subject = request.subject_iri(&self.config.document_namespace);
        let ingestion = self
            .ingestor
            .ingest(&document, &Node::named(&subject))
            .map_err(|e| e.to_string())?;
        if !ingestion.is_clean() {
            warn!(source = %request, rejected = ingestion.rejected.len(), "source ingested with rejected triples");
        }
        let metadata = SourceMetadata::new(request, subject, &document, ingestion.graph.len())
            .with_rejected(&ingestion.rejected);
        let graph = canonicalizer.canonicalize(ingestion.graph).map_err(|e| e.to_string())?;
        Ok((graph, metadata))
    }

    /// Canonical graph of the MIxS schema slots.
    pub fn schema_graph(&self, schema: &MixsSchema) -> Result<CanonicalGraph> {
        self.schema_graph_with(schema, &mut self.canonicalizer())
    }

    fn schema_graph_with(&self, schema: &MixsSchema, canonicalizer: &mut Canonicalizer) -> Result<CanonicalGraph> {
        canonicalizer.canonicalize(schema_graph(schema, &self.config)?)
    }

    /// Load every source and the schema, and merge them into one graph.
    pub fn build_graph(&self, provider: &dyn SourceProvider, schema: &MixsSchema) -> Result<BuiltGraph> {
        let mut canonicalizer = self.canonicalizer();
        let outcome = self.load_with(provider, &mut canonicalizer);
        let mixs = self.schema_graph_with(schema, &mut canonicalizer)?;

        let mut sources = outcome.sources;
        sources.push(SourceMetadata {
            kind: SourceKind::Mixs,
            id: "schema".to_string(),
            subject: self.config.mixs_namespace.clone(),
            hash: content_hash(schema.to_yaml_string()?.as_bytes()),
            triples: mixs.len(),
            rejected: Vec::new(),
        });

        let graph = merge(outcome.graphs.into_iter().chain(std::iter::once(mixs)));
        Ok(BuiltGraph {
            graph,
            sources,
            skipped: outcome.skipped,
            from_cache: false,
        })
    }

    /// Read the merged graph from `cache_path`, or build it and write it there.
    ///
    /// A cached graph is used as is; nothing is re-minted.
    pub fn load_or_build(
        &self,
        provider: &dyn SourceProvider,
        schema: &MixsSchema,
        cache_path: impl AsRef<Path>,
    ) -> Result<BuiltGraph> {
        let cache_path = cache_path.as_ref();
        if cache_path.exists() {
            info!(path = %cache_path.display(), "using cached graph");
            return Ok(BuiltGraph {
                graph: ntriples::load(cache_path)?,
                sources: Vec::new(),
                skipped: Vec::new(),
                from_cache: true,
            });
        }
        let built = self.build_graph(provider, schema)?;
        ntriples::save(&built.graph, cache_path)?;
        Ok(built)
    }

    /// Run the three mismatch queries over a merged graph.
    pub fn reconcile(&self, graph: &CanonicalGraph) -> ReconciliationResult {
        let index = VocabularyIndex::from_graph(graph.graph(), &self.config.document_namespace);
        let [ncbi_vs_mixs, ena_vs_mixs, mixs_vs_insdc] = match_all(&index);
        let result = ReconciliationResult {
            ncbi_vs_mixs,
            ena_vs_mixs,
            mixs_vs_insdc,
        };
        info!(mismatches = result.total(), "reconciled vocabularies");
        result
    }

    /// Examples and serializations of every slot in a merged graph.
    pub fn example_overview(&self, graph: &CanonicalGraph) -> Report {
        example_overview(graph.graph())
    }

    /// Validate slot patterns and templates.
    ///
    /// With `append_usage_examples`, class slot-usage examples are first folded
    /// into the base slots, which mutates `schema`.
    pub fn validate_schema(&self, schema: &mut MixsSchema, append_usage_examples: bool) -> ValidationReport {
        let appended = if append_usage_examples {
            let examples = collect_slot_usage_examples(schema);
            append_examples(schema, &examples)
        } else {
            0
        };
        let mut report = ValidationReport::run(schema);
        report.examples_appended = appended;
        report
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::MemorySource;
    use crate::schema::{FindingKind, SlotDefinition};
    use serde_json::json;
    use tempfile::tempdir;

    fn schema() -> MixsSchema {
        MixsSchema::default()
            .with_setting("float", r"[+-]?[0-9]*\.?[0-9]+")
            .with_slot(
                SlotDefinition::new("depth")
                    .with_title("depth")
                    .with_pattern("^[0-9]+ meter$")
                    .with_string_serialization("{float} {unit}")
                    .with_examples(["10 meter"]),
            )
            .with_slot(SlotDefinition::new("elev").with_title("elevation"))
            .with_class_usage("Soil", "depth", ["5 m"])
    }

    fn provider() -> MemorySource {
        MemorySource::new()
            .with_document(
                SourceKind::Ena,
                "ERC000011",
                json!({"CHECKLIST": {"FIELD": [
                    {"NAME": "elevation", "LABEL": "elevation"},
                    {"NAME": "collection device", "LABEL": "collection device"}
                ]}}),
            )
            .with_document(
                SourceKind::Ncbi,
                "biosample_attributes",
                json!({"BioSampleAttributes": {"Attribute": [
                    {"Name": "depth", "HarmonizedName": "depth"},
                    {"Name": "host subject id", "HarmonizedName": "host_subject_id"}
                ]}}),
            )
    }

    fn reconciler() -> Reconciler {
        Reconciler::with_config(ReconcileConfig::default().with_ena_checklists(["ERC000011", "ERC000012"]))
            .with_seed(7)
    }

    #[test]
    fn test_missing_sources_are_skipped() {
        let outcome = reconciler().load_sources(&provider());
        assert_eq!(outcome.graphs.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].id, "ERC000012");
        assert!(outcome.graphs.iter().all(|g| !g.graph().has_anonymous()));
    }

    #[test]
    fn test_build_and_reconcile() {
        let reconciler = reconciler();
        let built = reconciler.build_graph(&provider(), &schema()).unwrap();
        assert_eq!(built.sources.len(), 3);
        assert!(built.sources.iter().all(|s| s.hash.starts_with("sha256:")));

        let result = reconciler.reconcile(&built.graph);
        assert!(!result.ncbi_vs_mixs.reports("depth"));
        assert!(result.ncbi_vs_mixs.reports("host_subject_id"));
        assert!(result.ena_vs_mixs.reports("collection device"));
        assert!(!result.ena_vs_mixs.reports("elevation"));
        assert!(result.mixs_vs_insdc.reports("elev"));
        assert!(!result.mixs_vs_insdc.reports("depth"));
    }

    #[test]
    fn test_load_or_build_uses_cache() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("cache").join("merged.nt");
        let reconciler = reconciler();

        let first = reconciler.load_or_build(&provider(), &schema(), &cache).unwrap();
        assert!(!first.from_cache);
        assert!(cache.exists());

        let second = reconciler.load_or_build(&MemorySource::new(), &schema(), &cache).unwrap();
        assert!(second.from_cache);
        assert_eq!(second.graph, first.graph);
    }

    #[test]
    fn test_validate_with_append() {
        let mut schema = schema();
        let report = reconciler().validate_schema(&mut schema, true);
        assert_eq!(report.examples_appended, 1);
        assert_eq!(report.count(FindingKind::PatternMatch), 1);
        assert_eq!(report.count(FindingKind::PatternMismatch), 1);
        assert_eq!(report.count(FindingKind::UnresolvedPlaceholder), 1);
        assert_eq!(schema.slot("depth").unwrap().examples.len(), 2);
    }

    #[test]
    fn test_validate_without_append_leaves_schema() {
        let mut schema = schema();
        let before = schema.clone();
        let report = reconciler().validate_schema(&mut schema, false);
        assert_eq!(report.examples_appended, 0);
        assert_eq!(schema, before);
    }
}
