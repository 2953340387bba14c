//! Line classification for the markdown-ish text returned by the models.
//!
//! Only the constructs the analyses actually use are recognized: `#`, `##`
//! and `###` headings, `-`/`*` bullets and `N.` ordered items. Everything
//! else is body text.

mod segment;

pub use segment::{segment, segment_or_default, Section, Sections, DEFAULT_SECTION_TITLE};

use serde::{Serialize, Serializer};

/// Heading depth. Deeper headings are not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// The `#` prefix (including the trailing space) for this level.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::H1 => "# ",
            Self::H2 => "## ",
            Self::H3 => "### ",
        }
    }

    /// HTML tag name for this level.
    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Classify a heading line, returning its level and title text.
///
/// Prefixes are tried longest first so `## x` is never read as a level-1
/// heading titled `# x`. Four or more `#` characters match nothing.
pub fn parse_heading(line: &str) -> Option<(HeadingLevel, &str)> {
    for level in [HeadingLevel::H3, HeadingLevel::H2, HeadingLevel::H1] {
        if let Some(title) = line.strip_prefix(level.prefix()) {
            return Some((level, title));
        }
    }
    None
}

/// A list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItem<'a> {
    /// `- text` or `* text`
    Bullet(&'a str),
    /// `12. text`
    Numbered { number: &'a str, text: &'a str },
}

impl<'a> ListItem<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Self::Bullet(text) => text,
            Self::Numbered { text, .. } => text,
        }
    }
}

/// Classify a list item line.
pub fn parse_list_item(line: &str) -> Option<ListItem<'_>> {
    if let Some(text) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
    {
        return Some(ListItem::Bullet(text));
    }

    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let (number, rest) = line.split_at(digits);
    rest.strip_prefix(". ")
        .map(|text| ListItem::Numbered { number, text })
}
