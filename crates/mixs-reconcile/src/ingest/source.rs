//! Source documents and the providers that supply them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{ReconcileError, Result};

/// Vocabulary a source document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// ENA sample checklist.
    Ena,
    /// NCBI BioSample attribute list.
    Ncbi,
    /// MIxS LinkML schema.
    Mixs,
}

impl SourceKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Ena => "ENA",
            SourceKind::Ncbi => "NCBI",
            SourceKind::Mixs => "MIxS",
        }
    }

    /// Lower-case slug used in paths and subject IRIs.
    pub fn slug(&self) -> &'static str {
        match self {
            SourceKind::Ena => "ena",
            SourceKind::Ncbi => "ncbi",
            SourceKind::Mixs => "mixs",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A request for one source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRequest {
    pub kind: SourceKind,
    /// Document identifier, e.g. a checklist accession.
    pub id: String,
}

impl SourceRequest {
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Subject IRI the document is rooted at.
    pub fn subject_iri(&self, namespace: &str) -> String {
        format!("{}resource/{}/{}", namespace, self.kind.slug(), self.id)
    }
}

impl fmt::Display for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Supplies parsed source documents.
///
/// `Ok(None)` means the document is absent; the pipeline skips it the same
/// way it skips a document that failed to load.
pub trait SourceProvider {
    fn fetch(&self, request: &SourceRequest) -> Result<Option<Value>>;
}

/// Reads documents from `<root>/<kind>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a request resolves to.
    pub fn path_for(&self, request: &SourceRequest) -> PathBuf {
        self.root
            .join(request.kind.slug())
            .join(format!("{}.json", request.id))
    }
}

impl SourceProvider for DirectorySource {
    fn fetch(&self, request: &SourceRequest) -> Result<Option<Value>> {
        let path = self.path_for(request);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| ReconcileError::io(&path, e))?;
        let document = serde_json::from_str(&content).map_err(|e| ReconcileError::SourceUnavailable {
            source_id: request.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(Some(document))
    }
}

/// Holds documents in memory, keyed by request.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: IndexMap<SourceRequest, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    pub fn with_document(mut self, kind: SourceKind, id: impl Into<String>, document: Value) -> Self {
        self.documents.insert(SourceRequest::new(kind, id), document);
        self
    }

    pub fn insert(&mut self, kind: SourceKind, id: impl Into<String>, document: Value) {
        self.documents.insert(SourceRequest::new(kind, id), document);
    }
}

impl SourceProvider for MemorySource {
    fn fetch(&self, request: &SourceRequest) -> Result<Option<Value>> {
        Ok(self.documents.get(request).cloned())
    }
}

/// Metadata about an ingested source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub kind: SourceKind,
    pub id: String,
    /// Subject IRI the document was rooted at.
    pub subject: String,
    /// SHA-256 of the document's JSON serialization.
    pub hash: String,
    /// Triples produced by ingestion.
    pub triples: usize,
    /// Triples the ingestor rejected, with the reason for each.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
}

impl SourceMetadata {
    pub fn new(request: &SourceRequest, subject: String, document: &Value, triples: usize) -> Self {
        Self {
            kind: request.kind,
            id: request.id.clone(),
            subject,
            hash: document_hash(document),
            triples,
            rejected: Vec::new(),
        }
    }

    pub fn with_rejected<I, S>(mut self, rejected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rejected = rejected.into_iter().map(|r| r.to_string()).collect();
        self
    }
}

/// Fingerprint a document as `sha256:<hex>`.
pub fn document_hash(document: &Value) -> String {
    content_hash(document.to_string().as_bytes())
}

/// Fingerprint raw content as `sha256:<hex>`.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// A source that was excluded from the merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSource {
    pub kind: SourceKind,
    pub id: String,
    pub reason: String,
}

impl fmt::Display for SkippedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directory_source_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ena")).unwrap();
        fs::write(dir.path().join("ena/ERC000011.json"), r#"{"CHECKLIST_SET": {}}"#).unwrap();

        let source = DirectorySource::new(dir.path());
        let present = source.fetch(&SourceRequest::new(SourceKind::Ena, "ERC000011")).unwrap();
        assert!(present.is_some());
        let absent = source.fetch(&SourceRequest::new(SourceKind::Ena, "ERC000012")).unwrap();
        assert!(absent.is_none());
    }

    #[test]
    fn test_directory_source_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ncbi")).unwrap();
        fs::write(dir.path().join("ncbi/biosample_attributes.json"), "{not json").unwrap();

        let source = DirectorySource::new(dir.path());
        let err = source
            .fetch(&SourceRequest::new(SourceKind::Ncbi, "biosample_attributes"))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_subject_iri() {
        let request = SourceRequest::new(SourceKind::Ena, "ERC000011");
        assert_eq!(
            request.subject_iri("http://example.com/"),
            "http://example.com/resource/ena/ERC000011"
        );
    }

    #[test]
    fn test_hash_is_stable() {
        let doc = json!({"a": 1});
        assert_eq!(document_hash(&doc), document_hash(&doc.clone()));
        assert!(document_hash(&doc).starts_with("sha256:"));
    }
}
