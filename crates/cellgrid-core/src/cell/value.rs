//! Cell content values

use serde::{Deserialize, Serialize};
use std::fmt;

/// The content displayed by a cell
///
/// Declarations may carry text, numbers or booleans; `null` means the cell
/// has no content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellContent {
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text (or a persisted HTML fragment)
    Text(String),
    /// No content
    #[default]
    Empty,
}

impl CellContent {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellContent::Text(s.into())
    }

    /// True when the cell renders as an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            CellContent::Empty => true,
            CellContent::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Empty => Ok(()),
            CellContent::Bool(b) => write!(f, "{}", b),
            CellContent::Number(n) => write!(f, "{}", n),
            CellContent::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Text(s.to_string())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::Text(s)
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<bool> for CellContent {
    fn from(b: bool) -> Self {
        CellContent::Bool(b)
    }
}

impl<T: Into<CellContent>> From<Option<T>> for CellContent {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellContent::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_primitives() {
        let values: Vec<CellContent> =
            serde_json::from_str(r#"["x", 3, 2.5, true, null, ""]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellContent::text("x"),
                CellContent::Number(3.0),
                CellContent::Number(2.5),
                CellContent::Bool(true),
                CellContent::Empty,
                CellContent::text(""),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellContent::Number(3.0).to_string(), "3");
        assert_eq!(CellContent::Number(2.5).to_string(), "2.5");
        assert_eq!(CellContent::Bool(false).to_string(), "false");
        assert_eq!(CellContent::Empty.to_string(), "");
    }

    #[test]
    fn test_is_empty() {
        assert!(CellContent::Empty.is_empty());
        assert!(CellContent::text("").is_empty());
        assert!(!CellContent::Number(0.0).is_empty());
    }
}
