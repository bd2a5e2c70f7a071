//! Index range rules for ranged default styles
//!
//! A rule lists up to four bounds `[r1, c1, r2, c2]`. Row and column rules
//! only use `[i1, i2]`. Negative bounds count from the end (`-1` is the last
//! index). A missing start defaults to 0 and a missing end defaults to the
//! start, so `[2]` selects a single row or column.
//!
//! Rules are parsed permissively: a bare number, a JSON array or a string such
//! as `"1,-1"` or `"[1,-1]"` are all accepted. Anything else becomes
//! [`RangeRule::Malformed`], which matches nothing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::style::StyleAttrs;

/// A parsed range rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeRule {
    /// Raw bounds, possibly negative, not yet resolved against a table size
    Bounds(Vec<i64>),
    /// A rule that could not be parsed; never matches
    Malformed(String),
}

/// Bounds resolved against concrete table dimensions (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRange {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl NormalizedRange {
    /// Check if a cell lies within the range
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.r1 <= row && row <= self.r2 && self.c1 <= col && col <= self.c2
    }
}

impl Default for RangeRule {
    fn default() -> Self {
        RangeRule::Bounds(Vec::new())
    }
}

impl RangeRule {
    /// Parse a textual rule: `"2"`, `"1,-1"` or `"[0, 0, -1, 1]"`
    pub fn parse(text: &str) -> Result<Self> {
        let inner = text.replacen('[', "", 1).replacen(']', "", 1);
        if inner.trim().is_empty() {
            return Ok(RangeRule::Bounds(Vec::new()));
        }
        inner
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(RangeRule::Bounds)
            .map_err(|_| Error::UnmatchedRange(text.to_string()))
    }

    /// Interpret an arbitrary declaration value as a rule
    pub fn from_value(value: &Value) -> Self {
        let parsed = match value {
            Value::Null => Ok(RangeRule::Bounds(Vec::new())),
            Value::Number(n) => n
                .as_i64()
                .map(|i| RangeRule::Bounds(vec![i]))
                .ok_or_else(|| Error::UnmatchedRange(n.to_string())),
            Value::String(s) => Self::parse(s),
            Value::Array(items) => items
                .iter()
                .map(Value::as_i64)
                .collect::<Option<Vec<_>>>()
                .map(RangeRule::Bounds)
                .ok_or_else(|| Error::UnmatchedRange(value.to_string())),
            other => Err(Error::UnmatchedRange(other.to_string())),
        };

        parsed.unwrap_or_else(|e| {
            tracing::debug!("{e}; the rule will match nothing");
            RangeRule::Malformed(value.to_string())
        })
    }

    fn bounds(&self) -> Option<&[i64]> {
        match self {
            RangeRule::Bounds(b) if !b.is_empty() => Some(b),
            _ => None,
        }
    }

    /// Resolve a 2-D rule against a `rows` x `cols` table
    pub fn normalize(&self, rows: usize, cols: usize) -> Option<NormalizedRange> {
        let bounds = self.bounds()?;
        if rows == 0 || cols == 0 {
            return None;
        }
        let r1 = to_index(bounds, 0, rows, 0);
        let c1 = to_index(bounds, 1, cols, 0);
        let r2 = to_index(bounds, 2, rows, r1);
        let c2 = to_index(bounds, 3, cols, c1);
        Some(NormalizedRange { r1, c1, r2, c2 })
    }

    /// Resolve a 1-D (row or column) rule against a dimension of size `n`
    pub fn normalize_span(&self, n: usize) -> Option<(usize, usize)> {
        let bounds = self.bounds()?;
        if n == 0 {
            return None;
        }
        let start = to_index(bounds, 0, n, 0);
        let end = to_index(bounds, 1, n, start);
        Some((start, end))
    }

    /// Check whether the cell (`row`, `col`) is covered in a `rows` x `cols` table
    pub fn matches(&self, rows: usize, cols: usize, row: usize, col: usize) -> bool {
        self.normalize(rows, cols)
            .map_or(false, |range| range.contains(row, col))
    }

    /// Check whether `index` is covered in a dimension of size `n`
    pub fn matches_index(&self, n: usize, index: usize) -> bool {
        self.normalize_span(n)
            .map_or(false, |(start, end)| start <= index && index <= end)
    }
}

/// Take bound `i`, resolving negatives from the end and clamping into `0..n`
fn to_index(bounds: &[i64], i: usize, n: usize, default: usize) -> usize {
    let Some(&raw) = bounds.get(i) else {
        return default;
    };
    let n = n as i64;
    let idx = if raw < 0 { n.saturating_add(raw) } else { raw };
    idx.clamp(0, n - 1) as usize
}

impl<'de> Deserialize<'de> for RangeRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(RangeRule::from_value(&value))
    }
}

impl Serialize for RangeRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RangeRule::Bounds(bounds) => bounds.serialize(serializer),
            RangeRule::Malformed(raw) => raw.serialize(serializer),
        }
    }
}

/// A style attribute set applied wherever its range matches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangedDefault {
    #[serde(default)]
    pub range: RangeRule,
    #[serde(default)]
    pub def: StyleAttrs,
}

impl RangedDefault {
    pub fn new(range: RangeRule, def: StyleAttrs) -> Self {
        Self { range, def }
    }
}
