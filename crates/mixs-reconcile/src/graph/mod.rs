//! Graph model: nodes, triples, the in-memory store, blank-node
//! canonicalization, merging and the persisted line format.

mod canonical;
mod merge;
pub mod namespace;
pub mod ntriples;
mod store;
mod term;

pub use canonical::{CanonicalGraph, CanonicalizeStats, Canonicalizer};
pub use merge::merge;
pub use store::{Graph, TriplePattern, TripleStore};
pub use term::{BlankId, Literal, Node, Triple};
pub(crate) use term::check_iri;
