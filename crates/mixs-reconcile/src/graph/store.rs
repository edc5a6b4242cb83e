//! In-memory triple store.
//!
//! The store has set semantics: adding a triple that is already present is a
//! no-op. Iteration order is insertion order, but callers must not rely on it.

use indexmap::IndexSet;

use super::term::{Node, Triple};

/// Pattern for [`TripleStore::triples`]. `None` matches anything in that position.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriplePattern<'a> {
    pub subject: Option<&'a Node>,
    pub predicate: Option<&'a Node>,
    pub object: Option<&'a Node>,
}

impl<'a> TriplePattern<'a> {
    /// Pattern matching every triple.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: &'a Node) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: &'a Node) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: &'a Node) -> Self {
        self.object = Some(object);
        self
    }

    /// Check a triple against the pattern.
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.is_none_or(|s| s == triple.subject())
            && self.predicate.is_none_or(|p| p == triple.predicate())
            && self.object.is_none_or(|o| o == triple.object())
    }
}

/// Capability set every triple store offers.
pub trait TripleStore {
    /// Add a triple. Returns `true` if it was not already present.
    fn add(&mut self, triple: Triple) -> bool;

    /// Remove an exact triple. Returns `true` if it was present.
    fn remove(&mut self, triple: &Triple) -> bool;

    /// Lazily iterate the triples matching `pattern`.
    ///
    /// The iterator is finite, and calling this again restarts the scan.
    /// Yielded triples borrow the store only, not the pattern's nodes.
    fn triples<'g, 'p>(&'g self, pattern: TriplePattern<'p>) -> Box<dyn Iterator<Item = &'g Triple> + 'p>
    where
        'g: 'p;

    /// Number of distinct triples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, triple: &Triple) -> bool;
}

/// The canonical in-memory store.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: IndexSet<Triple>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over all triples.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of distinct anonymous nodes in subject or object position.
    pub fn anonymous_node_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for triple in &self.triples {
            for node in [triple.subject(), triple.object()] {
                if let Node::Anonymous(id) = node {
                    seen.insert(id.clone());
                }
            }
        }
        seen.len()
    }

    /// Whether any triple references an anonymous node.
    pub fn has_anonymous(&self) -> bool {
        self.triples.iter().any(Triple::has_anonymous)
    }

    /// All triples in sorted order, for deterministic output.
    pub fn sorted(&self) -> Vec<&Triple> {
        let mut triples: Vec<&Triple> = self.triples.iter().collect();
        triples.sort();
        triples
    }
}

impl TripleStore for Graph {
    fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.swap_remove(triple)
    }

    fn triples<'g, 'p>(&'g self, pattern: TriplePattern<'p>) -> Box<dyn Iterator<Item = &'g Triple> + 'p>
    where
        'g: 'p,
    {
        Box::new(self.triples.iter().filter(move |t| pattern.matches(t)))
    }

    fn len(&self) -> usize {
        self.triples.len()
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }
}

impl PartialEq for Graph {
    /// Graphs are equal when they hold the same triple set, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.triples.len() == other.triples.len()
            && self.triples.iter().all(|t| other.triples.contains(t))
    }
}

impl Eq for Graph {}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = indexmap::set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}
