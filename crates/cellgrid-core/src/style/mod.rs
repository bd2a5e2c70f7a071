//! Style attributes and their resolution
//!
//! - [`StyleKey`] - The closed set of recognised attributes
//! - [`StyleScope`] - Per-level whitelists
//! - [`StyleAttrs`] - Declared attribute sets (with an extension slot)
//! - [`StyleMap`] - A resolved, whitelisted style
//! - [`StyleResolver`] - The table/row/column/cell cascades

mod attrs;
mod key;
mod resolver;

pub use attrs::StyleAttrs;
pub use key::{StyleKey, StyleScope};
pub use resolver::StyleResolver;

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A resolved style: the effective value for each attribute that survived
/// the cascade
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleMap(BTreeMap<StyleKey, String>);

impl StyleMap {
    /// Create an empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, overriding any earlier value
    pub fn insert<V: Into<String>>(&mut self, key: StyleKey, value: V) {
        self.0.insert(key, value.into());
    }

    /// Get an attribute value
    pub fn get(&self, key: StyleKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Render as a CSS declaration list, e.g. `background-color: red; width: 3em`
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}: {}", key.css_name(), value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key.css_name(), value)?;
        }
        map.end()
    }
}
