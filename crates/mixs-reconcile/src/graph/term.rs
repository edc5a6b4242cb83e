//! Node and triple types.
//!
//! A node is one of:
//! - a named node (an IRI),
//! - an anonymous node, whose identity only holds within a single ingestion run,
//! - a literal value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{ReconcileError, Result};

/// Identifier of an anonymous node, scoped to one ingestion run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix).
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Literal value.
///
/// Doubles compare and hash by bit pattern so literals can live in sets.
#[derive(Clone, Debug)]
pub enum Literal {
    String(Arc<str>),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

impl Literal {
    pub fn string(s: impl AsRef<str>) -> Self {
        Literal::String(Arc::from(s.as_ref()))
    }

    /// Lexical form of the value, as used for label matching.
    pub fn lexical(&self) -> String {
        match self {
            Literal::String(s) => s.to_string(),
            Literal::Integer(i) => i.to_string(),
            Literal::Double(d) => d.to_string(),
            Literal::Boolean(b) => b.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Literal::String(_) => 0,
            Literal::Integer(_) => 1,
            Literal::Double(_) => 2,
            Literal::Boolean(_) => 3,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::String(a), Literal::String(b)) => a == b,
            (Literal::Integer(a), Literal::Integer(b)) => a == b,
            (Literal::Double(a), Literal::Double(b)) => a.to_bits() == b.to_bits(),
            (Literal::Boolean(a), Literal::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::String(s) => s.hash(state),
            Literal::Integer(i) => i.hash(state),
            Literal::Double(d) => d.to_bits().hash(state),
            Literal::Boolean(b) => b.hash(state),
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Literal::String(a), Literal::String(b)) => a.cmp(b),
            (Literal::Integer(a), Literal::Integer(b)) => a.cmp(b),
            (Literal::Double(a), Literal::Double(b)) => a.total_cmp(b),
            (Literal::Boolean(a), Literal::Boolean(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A node in subject, predicate or object position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// Full IRI.
    Named(Arc<str>),
    /// Anonymous node, valid only within one ingestion run.
    Anonymous(BlankId),
    /// Literal value.
    Literal(Literal),
}

impl Node {
    pub fn named(iri: impl AsRef<str>) -> Self {
        Node::Named(Arc::from(iri.as_ref()))
    }

    pub fn anonymous(label: impl AsRef<str>) -> Self {
        Node::Anonymous(BlankId::new(label))
    }

    pub fn string(value: impl AsRef<str>) -> Self {
        Node::Literal(Literal::string(value))
    }

    pub fn integer(value: i64) -> Self {
        Node::Literal(Literal::Integer(value))
    }

    pub fn double(value: f64) -> Self {
        Node::Literal(Literal::Double(value))
    }

    pub fn boolean(value: bool) -> Self {
        Node::Literal(Literal::Boolean(value))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Node::Named(_))
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Node::Anonymous(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Named(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Lexical form of a literal node; `None` for named and anonymous nodes.
    pub fn literal_lexical(&self) -> Option<String> {
        self.as_literal().map(Literal::lexical)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Named(iri) => write!(f, "<{}>", iri),
            Node::Anonymous(id) => write!(f, "{}", id),
            Node::Literal(lit) => write!(f, "\"{}\"", lit.lexical()),
        }
    }
}

/// Check that an IRI can be stored and written back to the line format.
pub(crate) fn check_iri(iri: &str) -> Result<()> {
    if iri.is_empty() {
        return Err(ReconcileError::malformed("empty IRI"));
    }
    if let Some(c) = iri
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
    {
        return Err(ReconcileError::malformed(format!(
            "IRI '{}' contains invalid character {:?}",
            iri, c
        )));
    }
    Ok(())
}

/// A (subject, predicate, object) statement.
///
/// # Invariants
///
/// - The subject is never a literal.
/// - The predicate is always a named node.
/// - Every named node carries a non-empty IRI without whitespace, `<`, `>` or `"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    subject: Node,
    predicate: Node,
    object: Node,
}

impl Triple {
    /// Build a triple, rejecting components that are invalid in their position.
    pub fn new(subject: Node, predicate: Node, object: Node) -> Result<Self> {
        match &subject {
            Node::Literal(lit) => {
                return Err(ReconcileError::malformed(format!(
                    "literal \"{}\" in subject position",
                    lit.lexical()
                )));
            }
            Node::Named(iri) => check_iri(iri)?,
            Node::Anonymous(id) if id.as_str().is_empty() => {
                return Err(ReconcileError::malformed("empty anonymous node label"));
            }
            Node::Anonymous(_) => {}
        }

        match &predicate {
            Node::Named(iri) => check_iri(iri)?,
            other => {
                return Err(ReconcileError::malformed(format!(
                    "predicate {} is not a named node",
                    other
                )));
            }
        }

        match &object {
            Node::Named(iri) => check_iri(iri)?,
            Node::Anonymous(id) if id.as_str().is_empty() => {
                return Err(ReconcileError::malformed("empty anonymous node label"));
            }
            _ => {}
        }

        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn predicate(&self) -> &Node {
        &self.predicate
    }

    pub fn object(&self) -> &Node {
        &self.object
    }

    /// Predicate IRI (always present by construction).
    pub fn predicate_iri(&self) -> &str {
        self.predicate.as_iri().unwrap_or_default()
    }

    pub fn has_anonymous(&self) -> bool {
        self.subject.is_anonymous() || self.object.is_anonymous()
    }

    /// Split into (subject, predicate, object).
    pub fn into_parts(self) -> (Node, Node, Node) {
        (self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
