//! Overview of the examples and serializations declared on schema slots.

use std::collections::BTreeSet;

use crate::graph::namespace::{dcterms, linkml, rdf, skos};
use crate::graph::{Graph, Literal, Node, TriplePattern, TripleStore};
use crate::report::Report;

fn string_values<'g>(graph: &'g Graph, subject: &Node, predicate: &Node) -> Vec<&'g str> {
    graph
        .triples(TriplePattern::any().with_subject(subject).with_predicate(predicate))
        .filter_map(|t| t.object().as_literal().and_then(Literal::as_str))
        .collect()
}

/// One row per `(title, example, serialization)` of every slot definition.
///
/// Title and example only appear together: a slot lacking either gets both
/// cells empty. A slot without string serialization gets that cell empty.
/// Rows are deduplicated and sorted.
pub fn example_overview(graph: &Graph) -> Report {
    let rdf_type = Node::named(rdf::TYPE);
    let slot_definition = Node::named(linkml::SLOT_DEFINITION);
    let example_class = Node::named(linkml::EXAMPLE);
    let title = Node::named(dcterms::TITLE);
    let examples = Node::named(linkml::EXAMPLES);
    let example_value = Node::named(skos::EXAMPLE);
    let serialization = Node::named(linkml::STRING_SERIALIZATION);

    let mut rows: BTreeSet<[String; 3]> = BTreeSet::new();
    let slots = graph.triples(
        TriplePattern::any()
            .with_predicate(&rdf_type)
            .with_object(&slot_definition),
    );
    for slot in slots.map(|t| t.subject()) {
        let titles = string_values(graph, slot, &title);
        let mut values = Vec::new();
        for example in graph
            .triples(TriplePattern::any().with_subject(slot).with_predicate(&examples))
            .map(|t| t.object())
        {
            let typed = TriplePattern::any()
                .with_subject(example)
                .with_predicate(&rdf_type)
                .with_object(&example_class);
            if graph.triples(typed).next().is_some() {
                values.extend(string_values(graph, example, &example_value));
            }
        }

        let mut pairs: Vec<(&str, &str)> = titles
            .iter()
            .flat_map(|t| values.iter().map(move |v| (*t, *v)))
            .collect();
        if pairs.is_empty() {
            pairs.push(("", ""));
        }
        let mut serializations = string_values(graph, slot, &serialization);
        if serializations.is_empty() {
            serializations.push("");
        }

        for (t, v) in &pairs {
            for s in &serializations {
                rows.insert([t.to_string(), v.to_string(), s.to_string()]);
            }
        }
    }

    let mut report = Report::new("Slot examples", ["title", "example", "serialization"]);
    for row in rows {
        report.push_row(row);
    }
    report
}
