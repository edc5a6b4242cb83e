//! MIxS schema slots as triples.

use tracing::info;

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::graph::namespace::{dcterms, linkml, owl, rdf, rdfs, skos};
use crate::graph::{Graph, Node, Triple, TripleStore};

use super::model::{MixsSchema, SlotDefinition};

/// Build the graph describing every slot of `schema`.
///
/// Example nodes are anonymous; canonicalize the result before merging it.
pub fn schema_graph(schema: &MixsSchema, config: &ReconcileConfig) -> Result<Graph> {
    let mut graph = Graph::new();
    let mut examples = 0;
    for slot in schema.slots() {
        examples += add_slot(&mut graph, schema, slot, &config.mixs_namespace)?;
    }
    info!(
        slots = schema.slots.len(),
        examples,
        triples = graph.len(),
        "built schema graph"
    );
    Ok(graph)
}

fn add_slot(graph: &mut Graph, schema: &MixsSchema, slot: &SlotDefinition, namespace: &str) -> Result<usize> {
    let subject = Node::named(format!("{}{}", namespace, slot.name));
    let property_kind = match slot.range.as_deref() {
        Some(range) if schema.is_class(range) => owl::OBJECT_PROPERTY,
        _ => owl::DATATYPE_PROPERTY,
    };

    let rdf_type = Node::named(rdf::TYPE);
    graph.add(Triple::new(subject.clone(), rdf_type.clone(), Node::named(property_kind))?);
    graph.add(Triple::new(subject.clone(), rdf_type.clone(), Node::named(linkml::SLOT_DEFINITION))?);
    graph.add(Triple::new(subject.clone(), Node::named(rdfs::LABEL), Node::string(&slot.name))?);

    let optional = [
        (dcterms::TITLE, slot.title.as_deref()),
        (linkml::PATTERN, slot.pattern()),
        (linkml::STRING_SERIALIZATION, slot.template()),
    ];
    for (predicate, value) in optional {
        if let Some(value) = value {
            graph.add(Triple::new(subject.clone(), Node::named(predicate), Node::string(value))?);
        }
    }

    for (i, value) in slot.example_values().enumerate() {
        let example = Node::anonymous(format!("{}_example{}", slot.name, i));
        graph.add(Triple::new(subject.clone(), Node::named(linkml::EXAMPLES), example.clone())?);
        graph.add(Triple::new(example.clone(), rdf_type.clone(), Node::named(linkml::EXAMPLE))?);
        graph.add(Triple::new(example, Node::named(skos::EXAMPLE), Node::string(value))?);
    }
    Ok(slot.examples.len())
}
