//! LinkML schema model for MIxS.
//!
//! Only the parts the validator and the schema graph need are typed; every
//! other key is kept in `extra` so a loaded schema keeps its content when
//! written back.
//!
//! Typed parts are read straight from the YAML event stream, never through a
//! buffered intermediate, so scalars keep their source text (`7.0` stays
//! `"7.0"`, `1e3` stays `"1e3"`).

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::marker::PhantomData;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_norway::Value as YamlValue;
use tracing::info;

use crate::error::{ReconcileError, Result};

/// A declared example value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Example {
    pub value: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl Example {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            extra: IndexMap::new(),
        }
    }
}

/// A slot definition from the schema's global `slots` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotDefinition {
    /// Slot name (the key under `slots`).
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_serialization: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl SlotDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_string_serialization(mut self, template: impl Into<String>) -> Self {
        self.string_serialization = Some(template.into());
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Example::new).collect();
        self
    }

    /// Non-empty pattern, if declared.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Non-empty string serialization template, if declared.
    pub fn template(&self) -> Option<&str> {
        self.string_serialization.as_deref().filter(|t| !t.is_empty())
    }

    /// Example values in declaration order.
    pub fn example_values(&self) -> impl Iterator<Item = &str> {
        self.examples.iter().map(|e| e.value.as_str())
    }
}

/// Per-class override of a slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotUsage {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

/// A class definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassDefinition {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub slot_usage: IndexMap<String, SlotUsage>,
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

/// A setting value, either `key: value` or the expanded LinkML form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Plain(String),
    Expanded {
        setting_value: String,
        #[serde(flatten)]
        extra: IndexMap<String, YamlValue>,
    },
}

impl SettingValue {
    pub fn value(&self) -> &str {
        match self {
            SettingValue::Plain(v) => v,
            SettingValue::Expanded { setting_value, .. } => setting_value,
        }
    }
}

/// Setting key to substitution value, read-only during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsTable(IndexMap<String, String>);

impl SettingsTable {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SettingsTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The MIxS LinkML schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MixsSchema {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub settings: IndexMap<String, SettingValue>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub classes: IndexMap<String, ClassDefinition>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, SlotDefinition>,
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl MixsSchema {
    /// Parse a schema from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml).map_err(|e| ReconcileError::SchemaLoad(e.to_string()))
    }

    fn parse(yaml: &str) -> std::result::Result<Self, serde_norway::Error> {
        let mut schema: MixsSchema = serde_norway::from_str(yaml)?;
        for (name, slot) in schema.slots.iter_mut() {
            slot.name = name.clone();
        }
        Ok(schema)
    }

    /// Load a schema file. Failure here aborts a run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ReconcileError::SchemaLoad(format!("{}: {}", path.display(), e)))?;
        let schema = Self::parse(&content)
            .map_err(|e| ReconcileError::SchemaLoad(format!("{}: {}", path.display(), e)))?;
        info!(
            path = %path.display(),
            classes = schema.classes.len(),
            slots = schema.slots.len(),
            "loaded schema"
        );
        Ok(schema)
    }

    /// Render the schema as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Write the schema as YAML to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ReconcileError::io(path, e))?;
        serde_norway::to_writer(BufWriter::new(file), self)?;
        info!(path = %path.display(), "wrote schema");
        Ok(())
    }

    /// Add a slot, keyed by its name.
    pub fn with_slot(mut self, slot: SlotDefinition) -> Self {
        self.slots.insert(slot.name.clone(), slot);
        self
    }

    /// Add a setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), SettingValue::Plain(value.into()));
        self
    }

    /// Add a class with slot-usage examples.
    pub fn with_class_usage<I, S>(mut self, class: impl Into<String>, slot: impl Into<String>, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let class = self.classes.entry(class.into()).or_default();
        class.slot_usage.insert(
            slot.into(),
            SlotUsage {
                examples: examples.into_iter().map(Example::new).collect(),
                extra: IndexMap::new(),
            },
        );
        self
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Slot-usage examples declared by `class`, per slot.
    pub fn slot_usage_examples<'a>(&'a self, class: &str) -> impl Iterator<Item = (&'a str, Vec<&'a str>)> + 'a {
        self.classes
            .get(class)
            .into_iter()
            .flat_map(|c| c.slot_usage.iter())
            .map(|(slot, usage)| (slot.as_str(), usage.examples.iter().map(|e| e.value.as_str()).collect()))
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots.values()
    }

    pub fn slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.get(name)
    }

    /// Whether `name` is a class of this schema.
    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Build the settings table used for template expansion.
    pub fn settings_table(&self) -> SettingsTable {
        self.settings.iter().map(|(k, v)| (k.clone(), v.value().to_string())).collect()
    }
}

// ============================================================================
// Deserialization
// ============================================================================

/// Scalar read as its source text.
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ScalarText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<ScalarText, E> {
                Ok(ScalarText(v.to_string()))
            }
        }

        deserializer.deserialize_str(ScalarVisitor)
    }
}

/// Map whose values may be YAML `null` (`slot_name:` with no body).
struct NullableMap<T>(IndexMap<String, T>);

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for NullableMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: Option<IndexMap<String, Option<T>>> = Option::deserialize(deserializer)?;
        Ok(NullableMap(
            raw.unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, v.unwrap_or_default()))
                .collect(),
        ))
    }
}

/// A mapping with a few typed keys; every other key lands in `extra`.
trait KeyedMapping: Default {
    const EXPECTING: &'static str;

    /// Read the value of a typed key. Returns `false` for keys kept as is.
    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error>;

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue>;
}

struct KeyedVisitor<T>(PhantomData<T>);

impl<'de, T: KeyedMapping> Visitor<'de> for KeyedVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<T, A::Error> {
        let mut out = T::default();
        while let Some(key) = map.next_key::<String>()? {
            if !out.read_key(&key, &mut map)? {
                let value: YamlValue = map.next_value()?;
                out.extra().insert(key, value);
            }
        }
        Ok(out)
    }
}

fn deserialize_keyed<'de, D: Deserializer<'de>, T: KeyedMapping>(deserializer: D) -> std::result::Result<T, D::Error> {
    deserializer.deserialize_map(KeyedVisitor(PhantomData))
}

fn optional_text<'de, A: MapAccess<'de>>(map: &mut A) -> std::result::Result<Option<String>, A::Error> {
    Ok(map.next_value::<Option<ScalarText>>()?.map(|t| t.0))
}

impl Default for Example {
    fn default() -> Self {
        Example::new("")
    }
}

impl KeyedMapping for Example {
    const EXPECTING: &'static str = "an example with a `value`";

    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error> {
        match key {
            "value" => {
                let text: ScalarText = map.next_value()?;
                self.value = text.0;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue> {
        &mut self.extra
    }
}

impl<'de> Deserialize<'de> for Example {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_keyed(deserializer)
    }
}

impl KeyedMapping for SlotDefinition {
    const EXPECTING: &'static str = "a slot definition";

    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error> {
        match key {
            "title" => self.title = optional_text(map)?,
            "range" => self.range = optional_text(map)?,
            "pattern" => self.pattern = optional_text(map)?,
            "string_serialization" => self.string_serialization = optional_text(map)?,
            "examples" => self.examples = map.next_value::<Option<Vec<Example>>>()?.unwrap_or_default(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue> {
        &mut self.extra
    }
}

impl<'de> Deserialize<'de> for SlotDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_keyed(deserializer)
    }
}

impl KeyedMapping for SlotUsage {
    const EXPECTING: &'static str = "a slot usage";

    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error> {
        match key {
            "examples" => self.examples = map.next_value::<Option<Vec<Example>>>()?.unwrap_or_default(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue> {
        &mut self.extra
    }
}

impl<'de> Deserialize<'de> for SlotUsage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_keyed(deserializer)
    }
}

impl KeyedMapping for ClassDefinition {
    const EXPECTING: &'static str = "a class definition";

    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error> {
        match key {
            "slot_usage" => self.slot_usage = map.next_value::<NullableMap<SlotUsage>>()?.0,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue> {
        &mut self.extra
    }
}

impl<'de> Deserialize<'de> for ClassDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_keyed(deserializer)
    }
}

impl KeyedMapping for MixsSchema {
    const EXPECTING: &'static str = "a LinkML schema";

    fn read_key<'de, A: MapAccess<'de>>(&mut self, key: &str, map: &mut A) -> std::result::Result<bool, A::Error> {
        match key {
            "settings" => {
                self.settings = map.next_value::<Option<IndexMap<String, SettingValue>>>()?.unwrap_or_default()
            }
            "classes" => self.classes = map.next_value::<NullableMap<ClassDefinition>>()?.0,
            "slots" => self.slots = map.next_value::<NullableMap<SlotDefinition>>()?.0,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extra(&mut self) -> &mut IndexMap<String, YamlValue> {
        &mut self.extra
    }
}

impl<'de> Deserialize<'de> for MixsSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_keyed(deserializer)
    }
}
