//! Line-oriented triple file, one `<s> <p> <o> .` statement per line.
//!
//! Literals are quoted and escaped; integer, double and boolean literals carry
//! an XSD datatype so they read back as the same value. The merged graph is
//! persisted in this format after canonicalization, so reading it back never
//! mints new identifiers.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{ReconcileError, Result};

use super::canonical::CanonicalGraph;
use super::namespace::xsd;
use super::store::{Graph, TripleStore};
use super::term::{Literal, Node, Triple};

/// Render a node in statement syntax.
pub fn format_node(node: &Node) -> String {
    match node {
        Node::Named(iri) => format!("<{}>", iri),
        Node::Anonymous(id) => id.to_string(),
        Node::Literal(Literal::String(s)) => format!("\"{}\"", escape(s)),
        Node::Literal(Literal::Integer(i)) => format!("\"{}\"^^<{}>", i, xsd::INTEGER),
        Node::Literal(Literal::Double(d)) => format!("\"{}\"^^<{}>", d, xsd::DOUBLE),
        Node::Literal(Literal::Boolean(b)) => format!("\"{}\"^^<{}>", b, xsd::BOOLEAN),
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Display adapter rendering a graph as sorted statements, one per line.
pub struct Statements<'a>(pub &'a Graph);

impl fmt::Display for Statements<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for triple in self.0.sorted() {
            writeln!(
                f,
                "{} {} {} .",
                format_node(triple.subject()),
                format_node(triple.predicate()),
                format_node(triple.object())
            )?;
        }
        Ok(())
    }
}

/// Write every triple of `graph`, sorted, to `writer`.
pub fn write_graph<W: Write>(graph: &Graph, mut writer: W) -> std::io::Result<()> {
    write!(writer, "{}", Statements(graph))?;
    writer.flush()
}

/// Render a whole graph as a string.
pub fn to_string(graph: &Graph) -> String {
    Statements(graph).to_string()
}

/// Parse statements into a graph. Blank lines and `#` comments are skipped.
pub fn parse_str(input: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let triple = parse_line(trimmed).map_err(|message| ReconcileError::GraphParse {
            line: line_no,
            message,
        })?;
        graph.add(triple);
    }
    Ok(graph)
}

/// Persist a canonical graph to `path`, creating parent directories.
pub fn save(graph: &CanonicalGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ReconcileError::io(parent, e))?;
        }
    }
    let file = File::create(path).map_err(|e| ReconcileError::io(path, e))?;
    write_graph(graph.graph(), BufWriter::new(file)).map_err(|e| ReconcileError::io(path, e))?;
    info!(path = %path.display(), triples = graph.len(), "saved graph");
    Ok(())
}

/// Load a previously saved canonical graph.
///
/// Fails if the file contains anonymous nodes.
pub fn load(path: impl AsRef<Path>) -> Result<CanonicalGraph> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ReconcileError::io(path, e))?;
    let graph = parse_str(&content)?;
    info!(path = %path.display(), triples = graph.len(), "loaded graph");
    CanonicalGraph::try_from(graph)
}

fn parse_line(line: &str) -> std::result::Result<Triple, String> {
    let mut cursor = Cursor::new(line);
    let subject = cursor.node()?;
    let predicate = cursor.node()?;
    let object = cursor.node()?;
    cursor.skip_ws();
    if !cursor.eat('.') {
        return Err("expected '.' at end of statement".to_string());
    }
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(format!("unexpected trailing input '{}'", cursor.rest()));
    }
    Triple::new(subject, predicate, object).map_err(|e| e.to_string())
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn node(&mut self) -> std::result::Result<Node, String> {
        self.skip_ws();
        match self.peek() {
            Some('<') => self.iri().map(Node::named),
            Some('_') => self.blank(),
            Some('"') => self.literal(),
            Some(c) => Err(format!("unexpected character {:?}", c)),
            None => Err("unexpected end of statement".to_string()),
        }
    }

    fn iri(&mut self) -> std::result::Result<String, String> {
        self.bump();
        let rest = self.rest();
        let end = rest.find('>').ok_or("unterminated IRI")?;
        let iri = rest[..end].to_string();
        self.pos += end + 1;
        Ok(iri)
    }

    fn blank(&mut self) -> std::result::Result<Node, String> {
        self.bump();
        if !self.eat(':') {
            return Err("expected ':' after '_'".to_string());
        }
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return Err("empty blank node label".to_string());
        }
        let label = rest[..end].to_string();
        self.pos += end;
        Ok(Node::anonymous(label))
    }

    fn literal(&mut self) -> std::result::Result<Node, String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some(c) => return Err(format!("unknown escape '\\{}'", c)),
                    None => return Err("unterminated escape".to_string()),
                },
                Some(c) => value.push(c),
                None => return Err("unterminated literal".to_string()),
            }
        }

        if !self.rest().starts_with("^^") {
            return Ok(Node::string(value));
        }
        self.pos += 2;
        if self.peek() != Some('<') {
            return Err("expected datatype IRI after '^^'".to_string());
        }
        let datatype = self.iri()?;
        match datatype.as_str() {
            xsd::STRING => Ok(Node::string(value)),
            xsd::INTEGER => value
                .parse::<i64>()
                .map(Node::integer)
                .map_err(|e| format!("invalid integer '{}': {}", value, e)),
            xsd::DOUBLE => value
                .parse::<f64>()
                .map(Node::double)
                .map_err(|e| format!("invalid double '{}': {}", value, e)),
            xsd::BOOLEAN => value
                .parse::<bool>()
                .map(Node::boolean)
                .map_err(|e| format!("invalid boolean '{}': {}", value, e)),
            other => Err(format!("unsupported datatype <{}>", other)),
        }
    }
}
