//! Style attribute keys and the per-level whitelists

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A recognised style attribute
///
/// Declarations name these in camelCase (`backgroundColor`); the resolved
/// styles are rendered with CSS property names (`background-color`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    BackgroundColor,
    Border,
    BorderTop,
    BorderBottom,
    BorderLeft,
    BorderRight,
    Color,
    FontFamily,
    FontSize,
    FontWeight,
    Height,
    HorizontalAlign,
    MaxWidth,
    MinWidth,
    TextAlign,
    VerticalAlign,
    Visibility,
    Width,
}

impl StyleKey {
    /// Every known key
    pub const ALL: [StyleKey; 18] = [
        StyleKey::BackgroundColor,
        StyleKey::Border,
        StyleKey::BorderTop,
        StyleKey::BorderBottom,
        StyleKey::BorderLeft,
        StyleKey::BorderRight,
        StyleKey::Color,
        StyleKey::FontFamily,
        StyleKey::FontSize,
        StyleKey::FontWeight,
        StyleKey::Height,
        StyleKey::HorizontalAlign,
        StyleKey::MaxWidth,
        StyleKey::MinWidth,
        StyleKey::TextAlign,
        StyleKey::VerticalAlign,
        StyleKey::Visibility,
        StyleKey::Width,
    ];

    /// Attribute name as written in declarations
    pub fn name(self) -> &'static str {
        match self {
            StyleKey::BackgroundColor => "backgroundColor",
            StyleKey::Border => "border",
            StyleKey::BorderTop => "borderTop",
            StyleKey::BorderBottom => "borderBottom",
            StyleKey::BorderLeft => "borderLeft",
            StyleKey::BorderRight => "borderRight",
            StyleKey::Color => "color",
            StyleKey::FontFamily => "fontFamily",
            StyleKey::FontSize => "fontSize",
            StyleKey::FontWeight => "fontWeight",
            StyleKey::Height => "height",
            StyleKey::HorizontalAlign => "horizontalAlign",
            StyleKey::MaxWidth => "maxWidth",
            StyleKey::MinWidth => "minWidth",
            StyleKey::TextAlign => "textAlign",
            StyleKey::VerticalAlign => "verticalAlign",
            StyleKey::Visibility => "visibility",
            StyleKey::Width => "width",
        }
    }

    /// CSS property name
    pub fn css_name(self) -> &'static str {
        match self {
            StyleKey::BackgroundColor => "background-color",
            StyleKey::Border => "border",
            StyleKey::BorderTop => "border-top",
            StyleKey::BorderBottom => "border-bottom",
            StyleKey::BorderLeft => "border-left",
            StyleKey::BorderRight => "border-right",
            StyleKey::Color => "color",
            StyleKey::FontFamily => "font-family",
            StyleKey::FontSize => "font-size",
            StyleKey::FontWeight => "font-weight",
            StyleKey::Height => "height",
            StyleKey::HorizontalAlign => "horizontal-align",
            StyleKey::MaxWidth => "max-width",
            StyleKey::MinWidth => "min-width",
            StyleKey::TextAlign => "text-align",
            StyleKey::VerticalAlign => "vertical-align",
            StyleKey::Visibility => "visibility",
            StyleKey::Width => "width",
        }
    }

    /// Look up a key by its declaration name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_name(s).ok_or_else(|| Error::InvalidStyleKey(s.to_string()))
    }
}

/// The level a style is resolved for; each level accepts its own whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleScope {
    /// The table element itself
    Table,
    /// A whole row
    Row,
    /// A whole column
    Column,
    /// Column attributes that cascade into the column's cells
    ColumnCell,
    /// A single cell
    Cell,
}

impl StyleScope {
    /// Check whether `key` may be applied at this level
    pub fn allows(self, key: StyleKey) -> bool {
        use StyleKey::*;
        match self {
            StyleScope::Table => matches!(
                key,
                BackgroundColor
                    | Border
                    | BorderTop
                    | BorderBottom
                    | BorderLeft
                    | BorderRight
                    | VerticalAlign
                    | TextAlign
                    | Color
                    | FontFamily
                    | FontSize
                    | Visibility
                    | Width
            ),
            StyleScope::Row => matches!(
                key,
                BackgroundColor
                    | Border
                    | BorderTop
                    | BorderBottom
                    | BorderLeft
                    | BorderRight
                    | VerticalAlign
                    | TextAlign
                    | Color
                    | FontFamily
                    | FontSize
                    | FontWeight
                    | Height
            ),
            StyleScope::Column => matches!(
                key,
                Width | BackgroundColor | Border | BorderTop | BorderBottom | BorderLeft | BorderRight
            ),
            StyleScope::ColumnCell => matches!(
                key,
                FontSize | VerticalAlign | TextAlign | FontFamily | Color | FontWeight
            ),
            StyleScope::Cell => matches!(
                key,
                VerticalAlign
                    | FontSize
                    | Border
                    | BorderTop
                    | BorderBottom
                    | BorderLeft
                    | BorderRight
                    | BackgroundColor
                    | TextAlign
                    | FontFamily
                    | Color
                    | FontWeight
                    | Width
                    | Height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in StyleKey::ALL {
            assert_eq!(StyleKey::from_name(key.name()), Some(key));
        }
        assert_eq!(StyleKey::from_name("colspan"), None);
        assert!("nope".parse::<StyleKey>().is_err());
    }

    #[test]
    fn test_whitelists() {
        assert!(StyleScope::Cell.allows(StyleKey::BackgroundColor));
        assert!(!StyleScope::Cell.allows(StyleKey::Visibility));
        assert!(StyleScope::Table.allows(StyleKey::Visibility));
        assert!(!StyleScope::Table.allows(StyleKey::FontWeight));
        assert!(StyleScope::Row.allows(StyleKey::Height));
        assert!(!StyleScope::Column.allows(StyleKey::Color));
        assert!(StyleScope::ColumnCell.allows(StyleKey::Color));
        assert!(!StyleScope::ColumnCell.allows(StyleKey::BackgroundColor));
        // Known keys outside every whitelist
        for scope in [
            StyleScope::Table,
            StyleScope::Row,
            StyleScope::Column,
            StyleScope::ColumnCell,
            StyleScope::Cell,
        ] {
            assert!(!scope.allows(StyleKey::MinWidth));
        }
    }
}
