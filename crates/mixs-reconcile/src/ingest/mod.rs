//! Source ingestion: documents, providers and the document-to-graph ingestor.

mod ingestor;
mod source;

pub use ingestor::{Ingestion, Ingestor, normalize_key};
pub use source::{
    DirectorySource, MemorySource, SkippedSource, SourceKind, SourceMetadata, SourceProvider,
    SourceRequest, content_hash, document_hash,
};
