//! Column declarations

use serde::{Deserialize, Serialize};

use crate::cell::lenient_span;

use crate::style::StyleAttrs;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Number of grid columns this declaration covers
    #[serde(
        default,
        deserialize_with = "lenient_span",
        skip_serializing_if = "Option::is_none"
    )]
    pub span: Option<u32>,
    /// Column-level style attributes
    #[serde(flatten)]
    pub style: StyleAttrs,
}

impl ColumnDecl {
    /// Create a column with default settings
    pub fn new() -> Self {
        Self::default()
    }
}
