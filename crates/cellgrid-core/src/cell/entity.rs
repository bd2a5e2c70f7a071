//! Declared cells: either a bare value or a value with attributes

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::CellContent;
use crate::style::{StyleAttrs, StyleKey};

/// A cell as written in a declaration or overlay
///
/// `"x"`, `3`, `true` and `null` are plain entities; objects carry attributes
/// and optionally a `cell` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellEntity {
    Styled(CellPatch),
    Plain(CellContent),
}

impl CellEntity {
    /// Normalize into the attribute form
    ///
    /// A plain `null` becomes an explicit empty content, so it still clears
    /// whatever was declared before it.
    pub fn to_patch(&self) -> CellPatch {
        match self {
            CellEntity::Styled(patch) => patch.clone(),
            CellEntity::Plain(content) => CellPatch::content(content.clone()),
        }
    }

    /// The content this entity carries, if any
    pub fn content(&self) -> Option<&CellContent> {
        match self {
            CellEntity::Styled(patch) => patch.cell.as_ref(),
            CellEntity::Plain(content) => Some(content),
        }
    }
}

impl From<CellContent> for CellEntity {
    fn from(content: CellContent) -> Self {
        CellEntity::Plain(content)
    }
}

impl From<&str> for CellEntity {
    fn from(s: &str) -> Self {
        CellEntity::Plain(CellContent::text(s))
    }
}

impl From<CellPatch> for CellEntity {
    fn from(patch: CellPatch) -> Self {
        CellEntity::Styled(patch)
    }
}

/// Attributes to apply onto a cell; absent fields leave the target untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellContent>,
    #[serde(
        default,
        deserialize_with = "lenient_span",
        skip_serializing_if = "Option::is_none"
    )]
    pub colspan: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_span",
        skip_serializing_if = "Option::is_none"
    )]
    pub rowspan: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub style: StyleAttrs,
}

impl CellPatch {
    /// A patch that only sets content
    pub fn content<C: Into<CellContent>>(content: C) -> Self {
        Self {
            cell: Some(content.into()),
            ..Self::default()
        }
    }

    /// Set the column span
    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = Some(colspan);
        self
    }

    /// Set the row span
    pub fn with_rowspan(mut self, rowspan: u32) -> Self {
        self.rowspan = Some(rowspan);
        self
    }

    /// Set a style attribute
    pub fn with_style<V: Into<String>>(mut self, key: StyleKey, value: V) -> Self {
        self.style.set(key, value);
        self
    }

    /// Overlay another patch onto this one
    pub fn merge_from(&mut self, other: &CellPatch) {
        if let Some(cell) = &other.cell {
            self.cell = Some(cell.clone());
        }
        if other.colspan.is_some() {
            self.colspan = other.colspan;
        }
        if other.rowspan.is_some() {
            self.rowspan = other.rowspan;
        }
        if other.id.is_some() {
            self.id = other.id.clone();
        }
        self.style.merge_from(&other.style);
    }

    /// Set any attribute by name (`colspan`, `rowspan`, `id`, a style key or an extension)
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match key {
            "cell" => self.cell = Some(CellContent::text(value)),
            "colspan" => self.colspan = value.trim().parse().ok(),
            "rowspan" => self.rowspan = value.trim().parse().ok(),
            "id" => self.id = Some(value.to_string()),
            _ => self.style.set_named(key, value),
        }
    }

    /// Remove one attribute by name. Content is never removed this way.
    pub fn remove_attribute(&mut self, key: &str) -> bool {
        match key {
            "cell" => false,
            "colspan" => self.colspan.take().is_some(),
            "rowspan" => self.rowspan.take().is_some(),
            "id" => self.id.take().is_some(),
            _ => self.style.remove_named(key),
        }
    }

    /// Remove every attribute except the content
    pub fn clear_attributes(&mut self) {
        self.colspan = None;
        self.rowspan = None;
        self.id = None;
        self.style.clear();
    }

    /// True when the patch carries nothing besides (optional) content
    pub fn has_attributes(&self) -> bool {
        self.colspan.is_some() || self.rowspan.is_some() || self.id.is_some() || !self.style.is_empty()
    }
}

/// Spans may be written as numbers or numeric strings; anything else is ignored.
pub(crate) fn lenient_span<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
