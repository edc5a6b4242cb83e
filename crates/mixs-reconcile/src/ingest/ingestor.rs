//! Nested JSON document to triples.
//!
//! Rules, applied recursively from the root subject:
//! - each key becomes a predicate `namespace + lower_snake(key)`;
//! - scalars become literal objects;
//! - nested objects get a fresh anonymous node typed `predicate + "Type"`;
//! - arrays are flattened under the same predicate, objects per the rule above.
//!
//! A value that cannot form a valid triple rejects that triple only (and, for
//! a nested object, the subtree below it). Ingestion carries on with the rest
//! of the document and the rejections are returned alongside the graph.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::NullPolicy;
use crate::error::{ReconcileError, Result};
use crate::graph::namespace::rdf;
use crate::graph::{Graph, Node, Triple, TripleStore};

/// Converts parsed source documents into graphs.
#[derive(Debug, Clone)]
pub struct Ingestor {
    namespace: String,
    null_policy: NullPolicy,
}

/// Graph produced from one document, plus the triples it had to reject.
#[derive(Debug, Default)]
pub struct Ingestion {
    pub graph: Graph,
    pub rejected: Vec<ReconcileError>,
}

impl Ingestion {
    /// Whether every value in the document produced its triples.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl Ingestor {
    /// Create an ingestor emitting predicates under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            null_policy: NullPolicy::default(),
        }
    }

    /// Set how `null` values are handled.
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Ingest one document rooted at `subject`.
    ///
    /// The document must be a JSON object. Anonymous node labels are local to
    /// this call and must be canonicalized before the graph is merged.
    pub fn ingest(&self, document: &Value, subject: &Node) -> Result<Ingestion> {
        let Value::Object(map) = document else {
            return Err(ReconcileError::malformed(format!(
                "document root must be an object, got {}",
                value_kind(document)
            )));
        };

        let mut run = IngestRun {
            ingestor: self,
            ingestion: Ingestion::default(),
            next_blank: 0,
        };
        run.object(subject, map);
        debug!(
            subject = %subject,
            triples = run.ingestion.graph.len(),
            rejected = run.ingestion.rejected.len(),
            anonymous_nodes = run.next_blank,
            "ingested document"
        );
        Ok(run.ingestion)
    }

    /// Predicate IRI for a document key.
    pub fn predicate_iri(&self, key: &str) -> String {
        format!("{}{}", self.namespace, normalize_key(key))
    }
}

/// Lower-case a key and replace spaces with underscores.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace(' ', "_")
}

struct IngestRun<'a> {
    ingestor: &'a Ingestor,
    ingestion: Ingestion,
    next_blank: usize,
}

impl IngestRun<'_> {
    fn object(&mut self, subject: &Node, map: &Map<String, Value>) {
        for (key, value) in map {
            let predicate_iri = self.ingestor.predicate_iri(key);
            let predicate = Node::named(&predicate_iri);
            let type_node = Node::named(format!("{}Type", predicate_iri));
            self.value(subject, &predicate, &type_node, value);
        }
    }

    fn value(&mut self, subject: &Node, predicate: &Node, type_node: &Node, value: &Value) {
        match value {
            Value::Object(nested) => {
                let blank = self.fresh_blank();
                if self.emit(subject.clone(), predicate.clone(), blank.clone())
                    && self.emit(blank.clone(), Node::named(rdf::TYPE), type_node.clone())
                {
                    self.object(&blank, nested);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.value(subject, predicate, type_node, item);
                }
            }
            scalar => match self.literal(subject, predicate, scalar) {
                Ok(literal) => {
                    self.emit(subject.clone(), predicate.clone(), literal);
                }
                Err(e) => self.reject(e),
            },
        }
    }

    fn literal(&self, subject: &Node, predicate: &Node, value: &Value) -> Result<Node> {
        match value {
            Value::String(s) => Ok(Node::string(s)),
            Value::Bool(b) => Ok(Node::boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Node::integer(i)),
                None => n.as_f64().map(Node::double).ok_or_else(|| {
                    ReconcileError::malformed(format!("number {} is not representable", n))
                }),
            },
            Value::Null => match self.ingestor.null_policy {
                NullPolicy::EmptyLiteral => Ok(Node::string("")),
                NullPolicy::Reject => Err(ReconcileError::malformed(format!(
                    "null value for {} on {}",
                    predicate, subject
                ))),
            },
            other => Err(ReconcileError::malformed(format!(
                "{} is not a scalar",
                value_kind(other)
            ))),
        }
    }

    fn fresh_blank(&mut self) -> Node {
        let node = Node::anonymous(format!("b{}", self.next_blank));
        self.next_blank += 1;
        node
    }

    /// Add a triple, or record why it was rejected. Returns whether it was added.
    fn emit(&mut self, subject: Node, predicate: Node, object: Node) -> bool {
        match Triple::new(subject, predicate, object) {
            Ok(triple) => {
                self.ingestion.graph.add(triple);
                true
            }
            Err(e) => {
                self.reject(e);
                false
            }
        }
    }

    fn reject(&mut self, error: ReconcileError) {
        warn!("rejected triple: {}", error);
        self.ingestion.rejected.push(error);
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
