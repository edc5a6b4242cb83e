//! Vocabulary IRIs used by the ingestor, the schema graph and the matcher.

/// Default namespace for predicates derived from ingested document keys.
pub const DEFAULT_DOCUMENT_NS: &str = "http://example.com/";

/// Default base for named nodes minted by the canonicalizer.
pub const DEFAULT_MINT_BASE: &str = "http://example.com/";

/// Default namespace for MIxS slot IRIs.
pub const DEFAULT_MIXS_NS: &str = "https://w3id.org/mixs/";

/// RDF vocabulary.
pub mod rdf {
    /// rdf:type
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDFS vocabulary.
pub mod rdfs {
    /// rdfs:label
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// OWL vocabulary.
pub mod owl {
    pub const DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
}

/// Dublin Core terms.
pub mod dcterms {
    /// dcterms:title
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
}

/// SKOS vocabulary.
pub mod skos {
    /// skos:example
    pub const EXAMPLE: &str = "http://www.w3.org/2004/02/skos/core#example";
}

/// LinkML metamodel.
pub mod linkml {
    pub const SLOT_DEFINITION: &str = "https://w3id.org/linkml/SlotDefinition";
    pub const EXAMPLE: &str = "https://w3id.org/linkml/Example";
    pub const EXAMPLES: &str = "https://w3id.org/linkml/examples";
    pub const PATTERN: &str = "https://w3id.org/linkml/pattern";
    pub const STRING_SERIALIZATION: &str = "https://w3id.org/linkml/string_serialization";
}

/// XSD datatypes used by the persisted graph format.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}
