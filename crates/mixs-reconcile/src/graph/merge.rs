//! Union of canonicalized source graphs.

use tracing::info;

use super::canonical::CanonicalGraph;
use super::store::TripleStore;

/// Merge canonical graphs into one.
///
/// The result is the set union of all inputs, so merge order never changes
/// the resulting triple set.
pub fn merge<I>(graphs: I) -> CanonicalGraph
where
    I: IntoIterator<Item = CanonicalGraph>,
{
    let mut graphs = graphs.into_iter();
    let Some(first) = graphs.next() else {
        return CanonicalGraph::default();
    };

    let mut merged = first.into_graph();
    let mut sources = 1;
    for graph in graphs {
        sources += 1;
        for triple in graph.into_graph() {
            merged.add(triple);
        }
    }

    info!(sources, triples = merged.len(), "merged source graphs");
    CanonicalGraph::from_graph_unchecked(merged)
}
