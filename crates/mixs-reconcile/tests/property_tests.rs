//! Property-based tests for the graph model and the schema validator.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p mixs-reconcile --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p mixs-reconcile --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use mixs_reconcile::graph::ntriples;
use mixs_reconcile::schema::{SettingsTable, expand_template};
use mixs_reconcile::{
    CanonicalGraph, Canonicalizer, Graph, Ingestor, Node, Triple, TripleStore, merge,
};

const MINT_BASE: &str = "http://minted.example.org/";

// =============================================================================
// Test Strategies
// =============================================================================

fn iri() -> impl Strategy<Value = Node> {
    "[a-z]{1,8}".prop_map(|local| Node::named(format!("http://example.com/{}", local)))
}

fn literal() -> impl Strategy<Value = Node> {
    prop_oneof![
        "\\PC{0,20}".prop_map(Node::string),
        any::<i64>().prop_map(Node::integer),
        (-1.0e6..1.0e6f64).prop_map(Node::double),
        any::<bool>().prop_map(Node::boolean),
    ]
}

fn blank() -> impl Strategy<Value = Node> {
    (0..6u8).prop_map(|n| Node::anonymous(format!("b{}", n)))
}

/// Triples without anonymous nodes.
fn named_triple() -> impl Strategy<Value = Triple> {
    (iri(), iri(), prop_oneof![iri(), literal()])
        .prop_map(|(s, p, o)| Triple::new(s, p, o).unwrap())
}

/// Triples that may reference anonymous nodes in subject or object position.
fn any_triple() -> impl Strategy<Value = Triple> {
    (
        prop_oneof![iri(), blank()],
        iri(),
        prop_oneof![iri(), blank(), literal()],
    )
        .prop_map(|(s, p, o)| Triple::new(s, p, o).unwrap())
}

fn named_graph() -> impl Strategy<Value = CanonicalGraph> {
    prop::collection::vec(named_triple(), 0..20)
        .prop_map(|triples| CanonicalGraph::try_from(triples.into_iter().collect::<Graph>()).unwrap())
}

fn any_graph() -> impl Strategy<Value = Graph> {
    prop::collection::vec(any_triple(), 0..30).prop_map(|triples| triples.into_iter().collect())
}

fn minted_nodes(graph: &Graph) -> HashSet<String> {
    graph
        .iter()
        .flat_map(|t| [t.subject(), t.object()])
        .filter_map(Node::as_iri)
        .filter(|iri| iri.starts_with(MINT_BASE))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Graph Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_add_is_idempotent(graph in any_graph(), triple in any_triple()) {
        let mut graph = graph;
        graph.add(triple.clone());
        let len = graph.len();
        prop_assert!(!graph.add(triple));
        prop_assert_eq!(graph.len(), len);
    }

    #[test]
    fn prop_canonicalize_replaces_each_anonymous_node_once(graph in any_graph()) {
        let anonymous = graph.anonymous_node_count();
        let len = graph.len();
        let canonical = Canonicalizer::with_base(MINT_BASE).canonicalize(graph).unwrap();

        prop_assert!(!canonical.graph().has_anonymous());
        prop_assert_eq!(minted_nodes(canonical.graph()).len(), anonymous);
        prop_assert_eq!(canonical.len(), len);
    }

    #[test]
    fn prop_merge_is_commutative(a in named_graph(), b in named_graph()) {
        let ab = merge([a.clone(), b.clone()]);
        let ba = merge([b, a]);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_merge_is_associative(a in named_graph(), b in named_graph(), c in named_graph()) {
        let left = merge([merge([a.clone(), b.clone()]), c.clone()]);
        let right = merge([a, merge([b, c])]);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_serialize_parse_round_trip(graph in any_graph()) {
        let canonical = Canonicalizer::with_base(MINT_BASE).canonicalize(graph).unwrap();
        let text = ntriples::to_string(canonical.graph());
        let parsed = ntriples::parse_str(&text).unwrap();
        prop_assert_eq!(&parsed, canonical.graph());
    }
}

// =============================================================================
// Ingestion and Template Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_flat_document_yields_one_triple_per_key(
        values in prop::collection::btree_map("[a-z_]{1,8}", "\\PC{0,10}", 0..10)
    ) {
        let document = serde_json::Value::Object(
            values.iter().map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone()))).collect(),
        );
        let subject = Node::named("http://example.com/resource/test");
        let graph = Ingestor::new("http://example.com/").ingest(&document, &subject).unwrap().graph;
        prop_assert_eq!(graph.len(), values.len());
        prop_assert!(!graph.has_anonymous());
    }

    #[test]
    fn prop_known_placeholders_always_resolve(
        keys in prop::collection::vec("[a-z]{1,6}", 1..5),
        sep in "[ a-z/]{0,3}",
    ) {
        let settings: SettingsTable = keys.iter().map(|k| (k.clone(), "[0-9]{2}".to_string())).collect();
        let template = keys.iter().map(|k| format!("{{{}}}", k)).collect::<Vec<_>>().join(&sep);
        let expansion = expand_template(&template, &settings);
        prop_assert!(expansion.is_resolved());
        let leaked = keys.iter().any(|k| expansion.expanded.contains(&format!("{{{}}}", k)));
        prop_assert!(!leaked);
    }

    #[test]
    fn prop_unknown_placeholders_are_reported(keys in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let template = keys.iter().map(|k| format!("{{{}}}", k)).collect::<Vec<_>>().join(" ");
        let expansion = expand_template(&template, &SettingsTable::default());
        prop_assert_eq!(expansion.unresolved.len(), keys.len());
        prop_assert_eq!(expansion.expanded, template);
    }
}
