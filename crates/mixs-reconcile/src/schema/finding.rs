//! Validation findings for schema slots.

use serde::{Deserialize, Serialize};

/// Kind of validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Example matches the slot pattern.
    PatternMatch,
    /// Example does not match the slot pattern.
    PatternMismatch,
    /// The slot pattern is not a valid regular expression.
    InvalidPattern,
    /// Every placeholder of the template resolved to a setting.
    TemplateExpanded,
    /// A template placeholder names a setting that does not exist.
    UnresolvedPlaceholder,
}

impl FindingKind {
    /// Get a human-readable label for the finding kind.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::PatternMatch => "Pattern Match",
            FindingKind::PatternMismatch => "Pattern Mismatch",
            FindingKind::InvalidPattern => "Invalid Pattern",
            FindingKind::TemplateExpanded => "Template Expanded",
            FindingKind::UnresolvedPlaceholder => "Unresolved Placeholder",
        }
    }

    /// Default severity for the kind.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::PatternMatch | FindingKind::TemplateExpanded => Severity::Info,
            FindingKind::InvalidPattern => Severity::Warning,
            FindingKind::PatternMismatch | FindingKind::UnresolvedPlaceholder => Severity::Error,
        }
    }
}

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Should be reviewed.
    Warning,
    /// Definite problem in the schema.
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// A validation result for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    /// Slot the finding is about.
    pub slot: String,
    /// Example value checked (pattern findings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Pattern or template that was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Unresolved fragment or expanded template, depending on kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Finding {
    /// Create a finding with the kind's default severity.
    pub fn new(kind: FindingKind, slot: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            slot: slot.into(),
            value: None,
            rule: None,
            detail: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether the finding reports a problem.
    pub fn is_failure(&self) -> bool {
        self.severity > Severity::Info
    }

    /// One-line description for logs and tables.
    pub fn describe(&self) -> String {
        match self.kind {
            FindingKind::PatternMatch => format!(
                "example '{}' matches pattern {}",
                self.value.as_deref().unwrap_or_default(),
                self.rule.as_deref().unwrap_or_default()
            ),
            FindingKind::PatternMismatch => format!(
                "example '{}' does not match pattern {}",
                self.value.as_deref().unwrap_or_default(),
                self.rule.as_deref().unwrap_or_default()
            ),
            FindingKind::InvalidPattern => format!(
                "pattern {} does not compile: {}",
                self.rule.as_deref().unwrap_or_default(),
                self.detail.as_deref().unwrap_or_default()
            ),
            FindingKind::TemplateExpanded => format!(
                "template {} expands to {}",
                self.rule.as_deref().unwrap_or_default(),
                self.detail.as_deref().unwrap_or_default()
            ),
            FindingKind::UnresolvedPlaceholder => format!(
                "template {} leaves {} unresolved",
                self.rule.as_deref().unwrap_or_default(),
                self.detail.as_deref().unwrap_or_default()
            ),
        }
    }
}
