//! Blank-node canonicalization.
//!
//! Every anonymous node is replaced by a freshly minted named node of the form
//! `<base>uuid/<random v4 UUID>`. Within one run the same anonymous node
//! always maps to the same named node; separate runs never share identifiers.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Builder;

use crate::error::{ReconcileError, Result};

use super::namespace::DEFAULT_MINT_BASE;
use super::store::{Graph, TripleStore};
use super::term::{BlankId, Node, Triple};

/// A graph that contains no anonymous nodes.
///
/// Only the canonicalizer, the merger and the persisted-graph reader produce
/// values of this type, so a `CanonicalGraph` can be merged with others
/// without aliasing anonymous nodes across sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalGraph(Graph);

impl CanonicalGraph {
    pub fn graph(&self) -> &Graph {
        &self.0
    }

    pub fn into_graph(self) -> Graph {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn from_graph_unchecked(graph: Graph) -> Self {
        Self(graph)
    }
}

impl TryFrom<Graph> for CanonicalGraph {
    type Error = ReconcileError;

    fn try_from(graph: Graph) -> Result<Self> {
        if let Some(triple) = graph.iter().find(|t| t.has_anonymous()) {
            return Err(ReconcileError::AnonymousNode(triple.to_string()));
        }
        Ok(Self(graph))
    }
}

impl AsRef<Graph> for CanonicalGraph {
    fn as_ref(&self) -> &Graph {
        &self.0
    }
}

/// Counts reported by one canonicalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalizeStats {
    /// Distinct anonymous nodes replaced.
    pub anonymous_nodes: usize,
    /// Triples rewritten.
    pub triples_rewritten: usize,
}

/// Replaces anonymous nodes with minted named nodes.
pub struct Canonicalizer {
    base: String,
    rng: fastrand::Rng,
    minted: HashSet<String>,
}

impl Canonicalizer {
    /// Create a canonicalizer minting under the default base.
    pub fn new() -> Self {
        Self::with_base(DEFAULT_MINT_BASE)
    }

    /// Create a canonicalizer minting under `base` (e.g. `http://example.com/`).
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rng: fastrand::Rng::new(),
            minted: HashSet::new(),
        }
    }

    /// Use a seeded generator. Two canonicalizers with the same seed mint the
    /// same identifiers, so this is only meant for reproducible tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Canonicalize one source graph.
    ///
    /// The lookup table lives for this call only; identifiers minted earlier by
    /// the same canonicalizer are never reused.
    pub fn canonicalize(&mut self, graph: Graph) -> Result<CanonicalGraph> {
        Ok(self.canonicalize_with_stats(graph)?.0)
    }

    /// Canonicalize one source graph and report what was replaced.
    ///
    /// Fails with `MalformedTriple` when a minted IRI is not valid under the
    /// configured base. Every rewritten triple is built before the graph is
    /// changed, so no triple is lost on failure.
    pub fn canonicalize_with_stats(&mut self, mut graph: Graph) -> Result<(CanonicalGraph, CanonicalizeStats)> {
        let mut lookup: HashMap<BlankId, Node> = HashMap::new();
        let pending: Vec<Triple> = graph.iter().filter(|t| t.has_anonymous()).cloned().collect();

        let mut rewritten = Vec::with_capacity(pending.len());
        for triple in &pending {
            let subject = self.resolve(triple.subject(), &mut lookup);
            let object = self.resolve(triple.object(), &mut lookup);
            rewritten.push(Triple::new(subject, triple.predicate().clone(), object)?);
        }

        for triple in &pending {
            graph.remove(triple);
        }
        let stats = CanonicalizeStats {
            anonymous_nodes: lookup.len(),
            triples_rewritten: rewritten.len(),
        };
        graph.extend(rewritten);

        debug!(
            anonymous_nodes = stats.anonymous_nodes,
            triples_rewritten = stats.triples_rewritten,
            "canonicalized graph"
        );
        Ok((CanonicalGraph(graph), stats))
    }

    fn resolve(&mut self, node: &Node, lookup: &mut HashMap<BlankId, Node>) -> Node {
        match node {
            Node::Anonymous(id) => {
                if let Some(named) = lookup.get(id) {
                    return named.clone();
                }
                let named = Node::named(self.mint());
                lookup.insert(id.clone(), named.clone());
                named
            }
            other => other.clone(),
        }
    }

    fn mint(&mut self) -> String {
        loop {
            let id = Builder::from_random_bytes(self.rng.u128(..).to_le_bytes()).into_uuid();
            let iri = format!("{}uuid/{}", self.base, id.hyphenated());
            if self.minted.insert(iri.clone()) {
                return iri;
            }
        }
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}
