//! Markdown to a spreadsheet-friendly CSV table.

use std::fmt::Write;

use crate::markdown::{parse_heading, HeadingLevel};

const HEADER: &str = "Section,Level,Content";
const INITIAL_SECTION: &str = "Summary";

/// Convert markdown to CSV with one row per non-blank body line.
///
/// Headings are not rows; they set the `Section` and `Level` columns for the
/// rows that follow. Rows before the first heading belong to `Summary`,
/// level 1. Text columns are always quoted with embedded quotes doubled.
pub fn to_csv(markdown: &str) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    let mut section = INITIAL_SECTION;
    let mut level = HeadingLevel::H1;

    for line in markdown.split('\n') {
        if let Some((heading_level, title)) = parse_heading(line) {
            section = title;
            level = heading_level;
        } else if !line.trim().is_empty() {
            writeln!(
                out,
                "{},{},{}",
                quote(section),
                level.as_u8(),
                quote(line)
            )
            .ok();
        }
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_rows(csv_text: &str) -> Vec<Vec<String>> {
        let mut reader = ::csv::Reader::from_reader(csv_text.as_bytes());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_rows_follow_headings() {
        let out = to_csv("# A\nrow1");
        assert!(out.starts_with("Section,Level,Content\n\"A\",1,\"row1\""));
    }

    #[test]
    fn test_initial_section_is_summary() {
        let out = to_csv("first line\n## Details\nsecond");
        assert_eq!(
            out,
            "Section,Level,Content\n\"Summary\",1,\"first line\"\n\"Details\",2,\"second\"\n"
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let out = to_csv("\n   \n### Deep\n\nx\n");
        assert_eq!(out, "Section,Level,Content\n\"Deep\",3,\"x\"\n");
    }

    #[test]
    fn test_quotes_doubled_and_parseable() {
        let out = to_csv("# The \"best\" plan\nHe said \"go\", then left");
        assert!(out.contains("\"The \"\"best\"\" plan\",1,\"He said \"\"go\"\", then left\""));

        let rows = read_rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "The \"best\" plan");
        assert_eq!(rows[0][1], "1");
        assert_eq!(rows[0][2], "He said \"go\", then left");
    }

    #[test]
    fn test_empty_input_is_header_only() {
        assert_eq!(to_csv(""), "Section,Level,Content\n");
    }
}
