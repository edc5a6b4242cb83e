//! Run configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};
use crate::graph::check_iri;
use crate::graph::namespace::{DEFAULT_DOCUMENT_NS, DEFAULT_MINT_BASE, DEFAULT_MIXS_NS};

/// ENA sample checklists compared against MIxS by default.
pub const DEFAULT_ENA_CHECKLISTS: &[&str] = &[
    "ERC000011", "ERC000012", "ERC000013", "ERC000014", "ERC000015", "ERC000016", "ERC000017",
    "ERC000018", "ERC000019", "ERC000020", "ERC000021", "ERC000022", "ERC000023", "ERC000024",
    "ERC000025", "ERC000027", "ERC000028", "ERC000029", "ERC000030", "ERC000031", "ERC000032",
    "ERC000033", "ERC000034", "ERC000035", "ERC000036", "ERC000037", "ERC000038", "ERC000039",
    "ERC000040", "ERC000041", "ERC000043", "ERC000044", "ERC000045", "ERC000047", "ERC000048",
    "ERC000049", "ERC000050", "ERC000051", "ERC000052", "ERC000053", "ERC000055", "ERC000056",
    "ERC000057", "ERC000058",
];

/// Name of the NCBI BioSample attribute document.
pub const DEFAULT_NCBI_DOCUMENT: &str = "biosample_attributes";

/// What the ingestor does with a JSON `null` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Reject the triple with a malformed-triple error. The rest of the
    /// document is still ingested.
    #[default]
    Reject,
    /// Emit an empty string literal.
    EmptyLiteral,
}

/// Configuration for a reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Namespace for predicates derived from document keys.
    pub document_namespace: String,
    /// Base IRI for named nodes minted during canonicalization.
    pub mint_base: String,
    /// Namespace for MIxS slot IRIs.
    pub mixs_namespace: String,
    /// ENA checklist accessions to load.
    pub ena_checklists: Vec<String>,
    /// NCBI attribute document name (without extension).
    pub ncbi_document: String,
    /// Handling of `null` document values.
    pub null_policy: NullPolicy,
    /// Maximum characters per report cell in table output (None = unlimited).
    pub report_cell_width: Option<usize>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            document_namespace: DEFAULT_DOCUMENT_NS.to_string(),
            mint_base: DEFAULT_MINT_BASE.to_string(),
            mixs_namespace: DEFAULT_MIXS_NS.to_string(),
            ena_checklists: DEFAULT_ENA_CHECKLISTS.iter().map(|s| s.to_string()).collect(),
            ncbi_document: DEFAULT_NCBI_DOCUMENT.to_string(),
            null_policy: NullPolicy::default(),
            report_cell_width: Some(50),
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ReconcileError::io(path, e))?;
        let config: ReconcileConfig = serde_json::from_str(&content)
            .map_err(|e| ReconcileError::Config(format!("{}: {}", path.display(), e)))?;
        config.check()?;
        Ok(config)
    }

    /// Reject namespaces that would produce invalid IRIs.
    pub fn check(&self) -> Result<()> {
        for (name, value) in [
            ("document_namespace", &self.document_namespace),
            ("mint_base", &self.mint_base),
            ("mixs_namespace", &self.mixs_namespace),
        ] {
            check_iri(value).map_err(|e| {
                ReconcileError::Config(format!("{} must be a valid IRI prefix: {}", name, e))
            })?;
        }
        Ok(())
    }

    /// Set the ENA checklists.
    pub fn with_ena_checklists<I, S>(mut self, checklists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ena_checklists = checklists.into_iter().map(Into::into).collect();
        self
    }

    /// Set the null handling policy.
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Set the report cell width.
    pub fn with_report_cell_width(mut self, width: Option<usize>) -> Self {
        self.report_cell_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReconcileConfig::default();
        assert_eq!(config.ena_checklists.len(), 44);
        assert_eq!(config.null_policy, NullPolicy::Reject);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"ena_checklists": ["ERC000011"], "null_policy": "empty_literal"}"#).unwrap();

        let config = ReconcileConfig::load(&path).unwrap();
        assert_eq!(config.ena_checklists, vec!["ERC000011"]);
        assert_eq!(config.null_policy, NullPolicy::EmptyLiteral);
        assert_eq!(config.document_namespace, DEFAULT_DOCUMENT_NS);
    }

    #[test]
    fn test_rejects_bad_namespace() {
        let config = ReconcileConfig {
            mint_base: "http://bad base/".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.check(), Err(ReconcileError::Config(_))));
    }

    #[test]
    fn test_mint_base_with_angle_brackets_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"mint_base": "http://example.com/<x>/"}"#).unwrap();

        let err = ReconcileConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReconcileError::Config(_)));
        assert!(err.to_string().contains("mint_base"));
    }
}
