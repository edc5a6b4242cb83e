//! Pattern and string-serialization checks over schema slots.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::report::Report;

use super::finding::{Finding, FindingKind, Severity};
use super::model::{MixsSchema, SettingsTable, SlotDefinition};

/// `{identifier}` placeholder in a string serialization template.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Result of expanding one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExpansion {
    /// Template with every known placeholder substituted.
    pub expanded: String,
    /// Fragments that still contain a `{`, in template order.
    pub unresolved: Vec<String>,
}

impl TemplateExpansion {
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitute every placeholder whose identifier is a setting key.
///
/// Unknown placeholders are left in place and reported, as is any `{` in the
/// template that does not open a well-formed placeholder. Substituted values
/// are not scanned again, so settings whose values contain braces (regex
/// quantifiers such as `{2}`) never count as unresolved.
pub fn expand_template(template: &str, settings: &SettingsTable) -> TemplateExpansion {
    let mut expanded = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&template[last..whole.start()], &mut expanded, &mut unresolved);
        match settings.get(&caps[1]) {
            Some(value) => expanded.push_str(value),
            None => {
                expanded.push_str(whole.as_str());
                unresolved.push(whole.as_str().to_string());
            }
        }
        last = whole.end();
    }
    push_literal(&template[last..], &mut expanded, &mut unresolved);

    TemplateExpansion { expanded, unresolved }
}

fn push_literal(text: &str, expanded: &mut String, unresolved: &mut Vec<String>) {
    if let Some(pos) = text.find('{') {
        unresolved.push(text[pos..].to_string());
    }
    expanded.push_str(text);
}

/// Compile a slot pattern anchored at the start of the value.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

/// Check every example of every slot that declares a pattern.
pub fn check_patterns(schema: &MixsSchema) -> Vec<Finding> {
    let mut findings = Vec::new();
    for slot in schema.slots() {
        findings.extend(check_slot_pattern(slot));
    }
    findings
}

/// Check one slot's examples against its pattern.
///
/// Slots without a pattern or without examples produce nothing.
pub fn check_slot_pattern(slot: &SlotDefinition) -> Vec<Finding> {
    let Some(pattern) = slot.pattern() else {
        return Vec::new();
    };
    if slot.examples.is_empty() {
        return Vec::new();
    }

    let regex = match compile_pattern(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(slot = %slot.name, pattern, "pattern does not compile: {}", e);
            return vec![Finding::new(FindingKind::InvalidPattern, &slot.name)
                .with_rule(pattern)
                .with_detail(e.to_string())];
        }
    };

    slot.example_values()
        .map(|example| {
            if regex.is_match(example) {
                debug!(slot = %slot.name, example, pattern, "example matches pattern");
                Finding::new(FindingKind::PatternMatch, &slot.name)
            } else {
                error!(slot = %slot.name, example, pattern, "example does not match pattern");
                Finding::new(FindingKind::PatternMismatch, &slot.name)
            }
            .with_value(example)
            .with_rule(pattern)
        })
        .collect()
}

/// Expand every slot's string serialization against the schema settings.
pub fn check_templates(schema: &MixsSchema) -> Vec<Finding> {
    let settings = schema.settings_table();
    let mut findings = Vec::new();
    for slot in schema.slots() {
        let Some(template) = slot.template() else {
            continue;
        };
        let expansion = expand_template(template, &settings);
        if expansion.is_resolved() {
            debug!(slot = %slot.name, template, expanded = %expansion.expanded, "template expanded");
            findings.push(
                Finding::new(FindingKind::TemplateExpanded, &slot.name)
                    .with_rule(template)
                    .with_detail(expansion.expanded),
            );
            continue;
        }
        for fragment in expansion.unresolved {
            error!(slot = %slot.name, template, fragment = %fragment, "unresolved placeholder");
            findings.push(
                Finding::new(FindingKind::UnresolvedPlaceholder, &slot.name)
                    .with_rule(template)
                    .with_detail(fragment),
            );
        }
    }
    findings
}

/// Findings of both passes over one schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// Slots inspected.
    pub slots: usize,
    /// Examples appended from class slot usage before validation.
    pub examples_appended: usize,
}

impl ValidationReport {
    /// Run the pattern and template passes.
    pub fn run(schema: &MixsSchema) -> Self {
        let mut findings = check_patterns(schema);
        findings.extend(check_templates(schema));
        let report = Self {
            findings,
            slots: schema.slots.len(),
            examples_appended: 0,
        };
        info!(
            slots = report.slots,
            passes = report.passes().count(),
            failures = report.failures().count(),
            "validated schema"
        );
        report
    }

    pub fn passes(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_failure())
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Tabular view of the findings.
    pub fn to_report(&self, failures_only: bool) -> Report {
        let mut report = Report::new(
            "Schema validation",
            ["severity", "type", "slot", "value", "rule", "detail"],
        );
        for finding in self.findings.iter().filter(|f| !failures_only || f.is_failure()) {
            report.push_row([
                finding.severity.label().to_string(),
                finding.kind.label().to_string(),
                finding.slot.clone(),
                finding.value.clone().unwrap_or_default(),
                finding.rule.clone().unwrap_or_default(),
                finding.detail.clone().unwrap_or_default(),
            ]);
        }
        report
    }
}
