//! Markdown to plain text.

use regex::Regex;
use std::sync::LazyLock;

use crate::markdown::{parse_heading, parse_list_item, HeadingLevel, ListItem};

const UNDERLINE_WIDTH: usize = 30;

/// Inline rewrite rules, applied in order. Bold must run before italic and
/// images before links, since each later pattern also matches the earlier
/// syntax.
static INLINE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"\*\*(.*?)\*\*").unwrap(), "$1"),
        (Regex::new(r"\*(.*?)\*").unwrap(), "$1"),
        (Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap(), "Image: $1"),
        (Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap(), "$1 ($2)"),
    ]
});

/// Convert markdown to plain text.
///
/// Headings become their text followed by an underline (`=` for level 1,
/// `-` for level 2, a blank line for level 3). Emphasis markers and bullet
/// prefixes are dropped, images become `Image: alt` and links become
/// `text (url)`.
pub fn to_plain_text(markdown: &str) -> String {
    markdown
        .split('\n')
        .map(convert_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_line(line: &str) -> String {
    let structural = match parse_heading(line) {
        Some((HeadingLevel::H1, title)) => {
            format!("{}\n{}\n", title, "=".repeat(UNDERLINE_WIDTH))
        }
        Some((HeadingLevel::H2, title)) => {
            format!("{}\n{}\n", title, "-".repeat(UNDERLINE_WIDTH))
        }
        Some((HeadingLevel::H3, title)) => format!("{}\n", title),
        None => match parse_list_item(line) {
            Some(ListItem::Bullet(text)) => text.to_string(),
            _ => line.to_string(),
        },
    };

    INLINE_RULES
        .iter()
        .fold(structural, |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}
