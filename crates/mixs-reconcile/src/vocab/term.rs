//! Vocabulary terms extracted from a merged graph.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::graph::namespace::{dcterms, owl, rdf, rdfs};
use crate::graph::{Graph, Literal, Node};

/// Local name of the type given to NCBI attribute nodes.
pub const NCBI_ATTRIBUTE_TYPE: &str = "attributeType";
/// Local name of the type given to ENA checklist field nodes.
pub const ENA_FIELD_TYPE: &str = "fieldType";

/// Which vocabulary a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularySource {
    Ncbi,
    Ena,
    Mixs,
}

impl fmt::Display for VocabularySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularySource::Ncbi => write!(f, "NCBI"),
            VocabularySource::Ena => write!(f, "ENA"),
            VocabularySource::Mixs => write!(f, "MIxS"),
        }
    }
}

/// OWL property kind of a MIxS term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Datatype,
    Object,
}

/// One subject of the graph and its string literal values, per predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyTerm {
    pub source: VocabularySource,
    pub subject: Node,
    /// Set for MIxS terms only.
    pub property_kind: Option<PropertyKind>,
    values: IndexMap<String, IndexSet<String>>,
}

impl VocabularyTerm {
    pub fn new(source: VocabularySource, subject: Node) -> Self {
        Self {
            source,
            subject,
            property_kind: None,
            values: IndexMap::new(),
        }
    }

    pub fn with_property_kind(mut self, kind: PropertyKind) -> Self {
        self.property_kind = Some(kind);
        self
    }

    pub fn with_value(mut self, predicate: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(predicate.into()).or_default().insert(value.into());
        self
    }

    /// String values of `predicate`.
    pub fn values<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .get(predicate)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// String values of any predicate.
    pub fn all_values(&self) -> impl Iterator<Item = &str> {
        self.values.values().flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_datatype(&self) -> bool {
        self.property_kind == Some(PropertyKind::Datatype)
    }

    /// Every `(a, b)` with `a` a value of `first` and `b` a value of `second`.
    ///
    /// Empty when either predicate has no value.
    pub fn pairs(&self, first: &str, second: &str) -> Vec<(String, String)> {
        let seconds: Vec<&str> = self.values(second).collect();
        self.values(first)
            .flat_map(|a| seconds.iter().map(move |b| (a.to_string(), b.to_string())))
            .collect()
    }
}

#[derive(Default)]
struct SubjectFacts<'g> {
    types: IndexSet<&'g str>,
    values: IndexMap<&'g str, IndexSet<&'g str>>,
}

/// NCBI attributes, ENA fields and MIxS terms found in one graph.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    namespace: String,
    ncbi: Vec<VocabularyTerm>,
    ena: Vec<VocabularyTerm>,
    mixs: Vec<VocabularyTerm>,
}

impl VocabularyIndex {
    /// Classify every subject of `graph` in a single pass.
    ///
    /// `namespace` is the one the ingested documents used for their
    /// predicates. A subject can belong to more than one vocabulary.
    pub fn from_graph(graph: &Graph, namespace: &str) -> Self {
        let mut facts: IndexMap<&Node, SubjectFacts<'_>> = IndexMap::new();
        for triple in graph.iter() {
            let entry = facts.entry(triple.subject()).or_default();
            let predicate = triple.predicate_iri();
            if predicate == rdf::TYPE {
                if let Some(iri) = triple.object().as_iri() {
                    entry.types.insert(iri);
                }
            } else if let Some(value) = triple.object().as_literal().and_then(Literal::as_str) {
                entry.values.entry(predicate).or_default().insert(value);
            }
        }

        let ncbi_type = format!("{}{}", namespace, NCBI_ATTRIBUTE_TYPE);
        let ena_type = format!("{}{}", namespace, ENA_FIELD_TYPE);
        let mut index = Self {
            namespace: namespace.to_string(),
            ..Self::default()
        };

        for (subject, facts) in &facts {
            let term = |source: VocabularySource| {
                let mut term = VocabularyTerm::new(source, (*subject).clone());
                for (predicate, values) in &facts.values {
                    for value in values {
                        term = term.with_value(*predicate, *value);
                    }
                }
                term
            };
            if facts.types.contains(ncbi_type.as_str()) {
                index.ncbi.push(term(VocabularySource::Ncbi));
            }
            if facts.types.contains(ena_type.as_str()) {
                index.ena.push(term(VocabularySource::Ena));
            }
            let kind = if facts.types.contains(owl::DATATYPE_PROPERTY) {
                Some(PropertyKind::Datatype)
            } else if facts.types.contains(owl::OBJECT_PROPERTY) {
                Some(PropertyKind::Object)
            } else {
                None
            };
            if let Some(kind) = kind {
                if facts.values.contains_key(rdfs::LABEL) {
                    index.mixs.push(term(VocabularySource::Mixs).with_property_kind(kind));
                }
            }
        }

        info!(
            subjects = facts.len(),
            ncbi = index.ncbi.len(),
            ena = index.ena.len(),
            mixs = index.mixs.len(),
            "indexed vocabularies"
        );
        index
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ncbi_attributes(&self) -> &[VocabularyTerm] {
        &self.ncbi
    }

    pub fn ena_fields(&self) -> &[VocabularyTerm] {
        &self.ena
    }

    pub fn mixs_terms(&self) -> &[VocabularyTerm] {
        &self.mixs
    }

    /// Document predicate IRI for a normalized key.
    pub fn predicate(&self, local: &str) -> String {
        format!("{}{}", self.namespace, local)
    }

    /// `(harmonized_name, name)` of every NCBI attribute.
    pub fn ncbi_pairs(&self) -> Vec<(String, String)> {
        let harmonized = self.predicate("harmonizedname");
        let name = self.predicate("name");
        self.ncbi.iter().flat_map(|t| t.pairs(&harmonized, &name)).collect()
    }

    /// `(name, label)` of every ENA field.
    pub fn ena_pairs(&self) -> Vec<(String, String)> {
        let name = self.predicate("name");
        let label = self.predicate("label");
        self.ena.iter().flat_map(|t| t.pairs(&name, &label)).collect()
    }

    /// `(label, title)` of every MIxS datatype term.
    pub fn mixs_datatype_pairs(&self) -> Vec<(String, String)> {
        self.mixs
            .iter()
            .filter(|t| t.is_datatype())
            .flat_map(|t| t.pairs(rdfs::LABEL, dcterms::TITLE))
            .collect()
    }

    /// `rdfs:label` values of every MIxS term.
    pub fn mixs_labels(&self) -> impl Iterator<Item = &str> {
        self.mixs.iter().flat_map(|t| t.values(rdfs::LABEL))
    }

    /// `dcterms:title` values of MIxS datatype terms.
    pub fn mixs_datatype_titles(&self) -> impl Iterator<Item = &str> {
        self.mixs
            .iter()
            .filter(|t| t.is_datatype())
            .flat_map(|t| t.values(dcterms::TITLE))
    }

    /// Every string value held by an ENA field or an NCBI attribute.
    pub fn insdc_values(&self) -> impl Iterator<Item = &str> {
        self.ena.iter().chain(&self.ncbi).flat_map(VocabularyTerm::all_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Triple, TripleStore};

    const NS: &str = "http://example.com/";

    fn add(graph: &mut Graph, s: &str, p: &str, o: Node) {
        graph.add(Triple::new(Node::named(s), Node::named(p), o).unwrap());
    }

    fn graph() -> Graph {
        let mut g = Graph::new();
        add(&mut g, "http://example.com/a1", rdf::TYPE, Node::named("http://example.com/attributeType"));
        add(&mut g, "http://example.com/a1", "http://example.com/harmonizedname", Node::string("depth"));
        add(&mut g, "http://example.com/a1", "http://example.com/name", Node::string("Depth"));
        add(&mut g, "http://example.com/a1", "http://example.com/name", Node::string("sample depth"));

        add(&mut g, "http://example.com/f1", rdf::TYPE, Node::named("http://example.com/fieldType"));
        add(&mut g, "http://example.com/f1", "http://example.com/name", Node::string("depth"));
        add(&mut g, "http://example.com/f1", "http://example.com/label", Node::string("depth"));

        add(&mut g, "https://w3id.org/mixs/depth", rdf::TYPE, Node::named(owl::OBJECT_PROPERTY));
        add(&mut g, "https://w3id.org/mixs/depth", rdfs::LABEL, Node::string("depth"));
        add(&mut g, "https://w3id.org/mixs/elev", rdf::TYPE, Node::named(owl::DATATYPE_PROPERTY));
        add(&mut g, "https://w3id.org/mixs/elev", rdfs::LABEL, Node::string("elev"));
        add(&mut g, "https://w3id.org/mixs/elev", dcterms::TITLE, Node::string("elevation"));
        // typed but unlabeled: not a term
        add(&mut g, "https://w3id.org/mixs/x", rdf::TYPE, Node::named(owl::DATATYPE_PROPERTY));
        g
    }

    #[test]
    fn test_classification() {
        let index = VocabularyIndex::from_graph(&graph(), NS);
        assert_eq!(index.ncbi_attributes().len(), 1);
        assert_eq!(index.ena_fields().len(), 1);
        assert_eq!(index.mixs_terms().len(), 2);
        assert_eq!(index.mixs_terms()[0].property_kind, Some(PropertyKind::Object));
        assert!(index.mixs_terms()[1].is_datatype());
    }

    #[test]
    fn test_multi_valued_pairs() {
        let index = VocabularyIndex::from_graph(&graph(), NS);
        assert_eq!(
            index.ncbi_pairs(),
            vec![
                ("depth".to_string(), "Depth".to_string()),
                ("depth".to_string(), "sample depth".to_string()),
            ]
        );
    }

    #[test]
    fn test_datatype_filters() {
        let index = VocabularyIndex::from_graph(&graph(), NS);
        assert_eq!(index.mixs_labels().collect::<Vec<_>>(), vec!["depth", "elev"]);
        assert_eq!(index.mixs_datatype_titles().collect::<Vec<_>>(), vec!["elevation"]);
        assert_eq!(
            index.mixs_datatype_pairs(),
            vec![("elev".to_string(), "elevation".to_string())]
        );
    }

    #[test]
    fn test_pairs_need_both_values() {
        let term = VocabularyTerm::new(VocabularySource::Ena, Node::named("http://example.com/f"))
            .with_value("http://example.com/name", "x");
        assert!(term.pairs("http://example.com/name", "http://example.com/label").is_empty());
    }

    #[test]
    fn test_insdc_values() {
        let index = VocabularyIndex::from_graph(&graph(), NS);
        let values: IndexSet<&str> = index.insdc_values().collect();
        assert!(values.contains("sample depth"));
        assert!(values.contains("depth"));
        assert!(!values.contains("elevation"));
    }
}
