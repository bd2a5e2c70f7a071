//! Spreadsheet-style cell coordinates ("C5") and their zero-based indices

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A cell coordinate
///
/// Displayed and parsed in A1 notation: the column is a bijective base-26
/// letter sequence (A..Z, AA..AZ, BA..) and the row is 1-based. Internally both
/// indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Row index (0-based internally, 1-based in display)
    pub row: usize,
    /// Column index (0-based, A=0, B=1, ..., Z=25, AA=26)
    pub col: usize,
}

impl CellCoord {
    /// Create a new coordinate from 0-based indices
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a coordinate from A1-style notation
    ///
    /// The text must match `[A-Z]* [0-9]*` with both parts present and a
    /// positive row number. Lowercase letters, `$` markers and whitespace are
    /// rejected.
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::CellCoord;
    ///
    /// let coord = CellCoord::parse("C5").unwrap();
    /// assert_eq!(coord, CellCoord::new(4, 2));
    ///
    /// assert!(CellCoord::parse("5C").is_err());
    /// assert!(CellCoord::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let split = s
            .bytes()
            .position(|b| !b.is_ascii_uppercase())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: usize = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(letters)?;

        Ok(Self { row: row - 1, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut n = col + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        letters.reverse();
        letters.into_iter().map(char::from).collect()
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Only uppercase ASCII letters are accepted.
    pub fn letters_to_column(letters: &str) -> Result<usize> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: usize = 0;
        for c in letters.bytes() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c as char
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add((c - b'A') as usize + 1))
                .ok_or_else(|| {
                    Error::InvalidAddress(format!("column '{}' is too large", letters))
                })?;
        }

        Ok(col - 1)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }

    /// Offset this coordinate, returning `None` on overflow
    pub fn offset(&self, rows: usize, cols: usize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(rows)?,
            col: self.col.checked_add(cols)?,
        })
    }
}

/// Encode 0-based indices as A1 text
pub fn encode(row: usize, col: usize) -> String {
    CellCoord::new(row, col).to_a1_string()
}

/// Decode A1 text into 0-based indices
pub fn decode(text: &str) -> Result<CellCoord> {
    CellCoord::parse(text)
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

// Addresses cross the presentation boundary as A1 text.
impl Serialize for CellCoord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_a1_string())
    }
}

impl<'de> Deserialize<'de> for CellCoord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
