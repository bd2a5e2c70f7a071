//! Declared style attribute sets

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{StyleKey, StyleMap, StyleScope};

/// A set of declared style attributes
///
/// Recognised keys are stored typed; anything else is kept verbatim in the
/// extension slot so declarations round-trip, but extensions are never
/// applied to a resolved style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleAttrs {
    values: BTreeMap<StyleKey, String>,
    extra: BTreeMap<String, Value>,
}

impl StyleAttrs {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with<V: Into<String>>(mut self, key: StyleKey, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Get a recognised attribute
    pub fn get(&self, key: StyleKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Set a recognised attribute
    pub fn set<V: Into<String>>(&mut self, key: StyleKey, value: V) {
        self.values.insert(key, value.into());
    }

    /// Remove a recognised attribute
    pub fn remove(&mut self, key: StyleKey) -> Option<String> {
        self.values.remove(&key)
    }

    /// Set an attribute by declaration name; unknown names go to the extension slot
    pub fn set_named(&mut self, name: &str, value: &str) {
        match StyleKey::from_name(name) {
            Some(key) => self.set(key, value),
            None => {
                self.extra
                    .insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    /// Remove an attribute by declaration name. Returns whether anything was removed.
    pub fn remove_named(&mut self, name: &str) -> bool {
        match StyleKey::from_name(name) {
            Some(key) => self.values.remove(&key).is_some(),
            None => self.extra.remove(name).is_some(),
        }
    }

    /// Unrecognised attributes, preserved verbatim
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Iterate recognised attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// True when there are no attributes at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extra.is_empty()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.values.clear();
        self.extra.clear();
    }

    /// Overlay another attribute set on top of this one (attribute by attribute)
    pub fn merge_from(&mut self, other: &StyleAttrs) {
        for (key, value) in &other.values {
            self.values.insert(*key, value.clone());
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Write the attributes allowed at `scope` into a resolved style
    pub fn apply_to(&self, styles: &mut StyleMap, scope: StyleScope) {
        for (key, value) in &self.values {
            if scope.allows(*key) {
                styles.insert(*key, value.clone());
            }
        }
    }
}

/// Style values may be written as strings, numbers or booleans.
fn style_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for StyleAttrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut attrs = StyleAttrs::new();
        for (name, value) in raw {
            if value.is_null() {
                continue;
            }
            match (StyleKey::from_name(&name), style_value_to_string(&value)) {
                (Some(key), Some(text)) => {
                    attrs.values.insert(key, text);
                }
                _ => {
                    attrs.extra.insert(name, value);
                }
            }
        }
        Ok(attrs)
    }
}

impl Serialize for StyleAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + self.extra.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.name(), value)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
