//! MIxS LinkML schema: model, example accumulation, validation and graph export.

mod examples;
mod finding;
mod graph;
mod model;
mod validator;

pub use examples::{SlotExamples, append_examples, collect_slot_usage_examples};
pub use finding::{Finding, FindingKind, Severity};
pub use graph::schema_graph;
pub use model::{
    ClassDefinition, Example, MixsSchema, SettingValue, SettingsTable, SlotDefinition, SlotUsage,
};
pub use validator::{
    TemplateExpansion, ValidationReport, check_patterns, check_slot_pattern, check_templates,
    compile_pattern, expand_template,
};
