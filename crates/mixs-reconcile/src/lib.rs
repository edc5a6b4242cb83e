//! mixs-reconcile: vocabulary reconciliation and schema validation for MIxS.
//!
//! The ENA sample checklists, the NCBI BioSample attribute list and the MIxS
//! LinkML schema are turned into triple graphs, their anonymous nodes replaced
//! by minted identifiers, and the graphs merged. Three anti-join queries over
//! the merged graph then report the terms each vocabulary lacks. Independently,
//! the schema's slot examples are checked against their patterns and every
//! string serialization template is expanded against the schema settings.
//!
//! # Example
//!
//! ```no_run
//! use mixs_reconcile::{DirectorySource, MixsSchema, Reconciler};
//!
//! let reconciler = Reconciler::new();
//! let schema = MixsSchema::load("mixs.yaml").unwrap();
//! let built = reconciler
//!     .build_graph(&DirectorySource::new("data"), &schema)
//!     .unwrap();
//!
//! for report in reconciler.reconcile(&built.graph).reports() {
//!     println!("{}: {} mismatches", report.title, report.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod report;
pub mod schema;
pub mod vocab;

mod reconciler;

pub use crate::reconciler::{BuiltGraph, IngestOutcome, ReconciliationResult, Reconciler};
pub use config::{NullPolicy, ReconcileConfig};
pub use error::{ReconcileError, Result};
pub use graph::{CanonicalGraph, Canonicalizer, Graph, Node, Triple, TriplePattern, TripleStore, merge};
pub use ingest::{DirectorySource, Ingestor, MemorySource, SourceKind, SourceMetadata, SourceProvider};
pub use report::Report;
pub use schema::{Finding, FindingKind, MixsSchema, Severity, ValidationReport};
pub use vocab::{MismatchReport, VocabularyIndex, example_overview};
