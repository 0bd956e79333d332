use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Decoder output
// ---------------------------------------------------------------------------

/// A single word with the style of the glyphs that compose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub size: f64,
    pub font_name: String,
}

impl Word {
    pub fn new(text: impl Into<String>, size: f64, font_name: impl Into<String>) -> Self {
        Word {
            text: text.into(),
            size,
            font_name: font_name.into(),
        }
    }
}

/// Size and font of one glyph on a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharStyle {
    pub size: f64,
    pub font_name: String,
}

impl CharStyle {
    pub fn new(size: f64, font_name: impl Into<String>) -> Self {
        CharStyle {
            size,
            font_name: font_name.into(),
        }
    }
}

/// One physical text line on a page.
///
/// `top` is the distance from the top edge of the page to the top of the
/// line. `chars` holds one entry per glyph, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub top: f64,
    pub chars: Vec<CharStyle>,
}

impl Line {
    /// The style of the first glyph, which stands in for the whole line.
    pub fn leading_style(&self) -> Option<&CharStyle> {
        self.chars.first()
    }
}

/// A decoded page: its words and its text lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub words: Vec<Word>,
    pub lines: Vec<Line>,
}

// ---------------------------------------------------------------------------
// Intermediate results
// ---------------------------------------------------------------------------

/// The dominant body text style of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStyle {
    pub size: i64,
    pub font_name: String,
    pub is_bold: bool,
}

/// A line whose heading score cleared the acceptance threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Whitespace-collapsed, trimmed line text.
    pub text: String,
    /// Rounded size of the line's first glyph.
    pub size: i64,
    /// 0-based page index.
    pub page: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const H1: Self = HeadingLevel(1);
    pub const H2: Self = HeadingLevel(2);
    pub const H3: Self = HeadingLevel(3);

    /// Deepest level an outline may carry.
    pub const MAX: u8 = 3;

    /// Numeric rank used for ordering (H1 = 1).
    pub fn rank(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX).contains(&value) {
            Ok(HeadingLevel(value))
        } else {
            Err(InvalidHeadingLevel)
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl FromStr for HeadingLevel {
    type Err = InvalidHeadingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('H').ok_or(InvalidHeadingLevel)?;
        let value = digits.parse::<u8>().map_err(|_| InvalidHeadingLevel)?;
        HeadingLevel::try_from(value)
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Rounded font size -> heading level. Never holds the title size.
pub type LevelMap = BTreeMap<i64, HeadingLevel>;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

/// The `{title, outline}` structure written for every document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutlineDocument {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

#[derive(Debug, Error)]
#[error("Heading level must be one of H1, H2 or H3")]
pub struct InvalidHeadingLevel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_valid() {
        assert!(HeadingLevel::try_from(1).is_ok());
        assert!(HeadingLevel::try_from(3).is_ok());
    }

    #[test]
    fn test_heading_level_invalid() {
        assert!(HeadingLevel::try_from(0).is_err());
        assert!(HeadingLevel::try_from(4).is_err());
    }

    #[test]
    fn test_heading_level_display_and_parse() {
        assert_eq!(HeadingLevel::H2.to_string(), "H2");
        assert_eq!("H3".parse::<HeadingLevel>().unwrap(), HeadingLevel::H3);
        assert!("H7".parse::<HeadingLevel>().is_err());
        assert!("2".parse::<HeadingLevel>().is_err());
    }

    #[test]
    fn test_heading_level_serializes_as_tag() {
        let entry = OutlineEntry {
            level: HeadingLevel::H1,
            text: "Introduction".to_string(),
            page: 2,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"level":"H1","text":"Introduction","page":2}"#);

        let back: OutlineEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_document_field_order() {
        let doc = OutlineDocument {
            title: "Résumé".to_string(),
            outline: vec![],
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"title":"Résumé","outline":[]}"#);
    }

    #[test]
    fn test_leading_style_is_first_char() {
        let line = Line {
            text: "Ab".to_string(),
            top: 10.0,
            chars: vec![CharStyle::new(18.0, "Arial-Bold"), CharStyle::new(12.0, "Arial")],
        };
        assert_eq!(line.leading_style().unwrap().font_name, "Arial-Bold");

        let empty = Line {
            text: String::new(),
            top: 0.0,
            chars: vec![],
        };
        assert!(empty.leading_style().is_none());
    }
}
