//! Splits markdown text into titled sections.

use serde::Serialize;

use super::{parse_heading, HeadingLevel};

/// Title given to text that contains no headings at all.
pub const DEFAULT_SECTION_TITLE: &str = "Comprehensive Analysis";

/// A titled, leveled run of consecutive body lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: Option<String>,
    pub level: HeadingLevel,
    pub lines: Vec<String>,
}

impl Section {
    fn titled(level: HeadingLevel, title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            level,
            lines: Vec::new(),
        }
    }

    fn untitled() -> Self {
        Self {
            title: None,
            level: HeadingLevel::H1,
            lines: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        self.title.is_some() || !self.lines.is_empty()
    }

    /// The source lines this section was built from, heading included.
    pub fn raw_lines(&self) -> Vec<String> {
        let heading = self
            .title
            .as_ref()
            .map(|t| format!("{}{}", self.level.prefix(), t));
        heading.into_iter().chain(self.lines.iter().cloned()).collect()
    }
}

/// Lazy iterator over the sections of a text.
///
/// Cloning it (or calling [`segment`] again) restarts the scan.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    lines: std::str::Split<'a, char>,
    current: Option<Section>,
    exhausted: bool,
}

/// Segment `text` on `#`, `##` and `###` headings.
///
/// Lines are split on `\n` only, so the sections' raw lines always join back
/// into the original text.
pub fn segment(text: &str) -> Sections<'_> {
    Sections {
        lines: text.split('\n'),
        current: None,
        exhausted: text.is_empty(),
    }
}

impl Iterator for Sections<'_> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        if self.exhausted {
            return None;
        }

        for line in self.lines.by_ref() {
            match parse_heading(line) {
                Some((level, title)) => {
                    let finished = self.current.replace(Section::titled(level, title));
                    if let Some(section) = finished.filter(Section::has_content) {
                        return Some(section);
                    }
                }
                None => self
                    .current
                    .get_or_insert_with(Section::untitled)
                    .lines
                    .push(line.to_string()),
            }
        }

        self.exhausted = true;
        self.current.take().filter(Section::has_content)
    }
}

/// Segment `text`, titling it `default_title` when it has no headings.
pub fn segment_or_default(text: &str, default_title: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = segment(text).collect();
    if let [only] = sections.as_mut_slice() {
        if only.title.is_none() {
            only.title = Some(default_title.to_string());
            only.level = HeadingLevel::H1;
        }
    }
    sections
}
