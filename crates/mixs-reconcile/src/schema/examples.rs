//! Folding class slot-usage examples into the base slot definitions.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use super::model::{Example, MixsSchema};

/// Examples found in class `slot_usage` sections, per slot, deduplicated by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotExamples {
    by_slot: IndexMap<String, IndexSet<String>>,
}

impl SlotExamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one example for `slot`. Returns `false` if it was already known.
    pub fn add(&mut self, slot: impl Into<String>, value: impl Into<String>) -> bool {
        self.by_slot.entry(slot.into()).or_default().insert(value.into())
    }

    pub fn get(&self, slot: &str) -> Option<&IndexSet<String>> {
        self.by_slot.get(slot)
    }

    /// Number of slots with at least one example.
    pub fn slot_count(&self) -> usize {
        self.by_slot.len()
    }

    /// Total examples across slots.
    pub fn example_count(&self) -> usize {
        self.by_slot.values().map(IndexSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.by_slot.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Collect the slot-usage examples of every class.
pub fn collect_slot_usage_examples(schema: &MixsSchema) -> SlotExamples {
    let examples = schema.class_names().fold(SlotExamples::new(), |mut acc, class| {
        for (slot, values) in schema.slot_usage_examples(class) {
            for value in values {
                debug!(class, slot, value, "slot usage example");
                acc.add(slot, value);
            }
        }
        acc
    });
    info!(
        slots = examples.slot_count(),
        examples = examples.example_count(),
        "collected slot usage examples"
    );
    examples
}

/// Append collected examples to the matching base slots.
///
/// Values already present on a slot are not added again. Slots that are not
/// defined in the schema's `slots` section are ignored. Returns the number of
/// examples added.
pub fn append_examples(schema: &mut MixsSchema, examples: &SlotExamples) -> usize {
    let mut added = 0;
    for (name, slot) in schema.slots.iter_mut() {
        let Some(values) = examples.get(name) else {
            continue;
        };
        let mut present: IndexSet<String> = slot.examples.iter().map(|e| e.value.clone()).collect();
        for value in values {
            if present.insert(value.clone()) {
                slot.examples.push(Example::new(value.clone()));
                added += 1;
            }
        }
    }
    info!(added, "appended slot usage examples to slots");
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SlotDefinition;

    fn schema() -> MixsSchema {
        MixsSchema::default()
            .with_slot(SlotDefinition::new("depth").with_examples(["5 meter"]))
            .with_slot(SlotDefinition::new("elev"))
            .with_class_usage("Soil", "depth", ["10 meter", "5 meter"])
            .with_class_usage("Water", "depth", ["10 meter", "200 meter"])
            .with_class_usage("Water", "unknown_slot", ["x"])
    }

    #[test]
    fn test_collect_deduplicates_across_classes() {
        let examples = collect_slot_usage_examples(&schema());
        let depth: Vec<&str> = examples.get("depth").unwrap().iter().map(String::as_str).collect();
        assert_eq!(depth, vec!["10 meter", "5 meter", "200 meter"]);
        assert_eq!(examples.slot_count(), 2);
    }

    #[test]
    fn test_append_skips_existing_values() {
        let mut schema = schema();
        let examples = collect_slot_usage_examples(&schema);
        let added = append_examples(&mut schema, &examples);

        assert_eq!(added, 2);
        let depth: Vec<&str> = schema.slot("depth").unwrap().example_values().collect();
        assert_eq!(depth, vec!["5 meter", "10 meter", "200 meter"]);
        assert!(schema.slot("elev").unwrap().examples.is_empty());
    }

    #[test]
    fn test_append_twice_is_stable() {
        let mut schema = schema();
        let examples = collect_slot_usage_examples(&schema);
        append_examples(&mut schema, &examples);
        assert_eq!(append_examples(&mut schema, &examples), 0);
    }

    #[test]
    fn test_class_usage_is_untouched() {
        let mut schema = schema();
        let before = schema.classes.clone();
        let examples = collect_slot_usage_examples(&schema);
        append_examples(&mut schema, &examples);
        assert_eq!(schema.classes, before);
    }
}
