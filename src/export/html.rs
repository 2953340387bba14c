//! Markdown to a standalone HTML document that word processors can open.

use chrono::{Local, NaiveDateTime};

use crate::markdown::{parse_heading, parse_list_item, ListItem};

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Analysis Report</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }
    h1 { color: #2563eb; border-bottom: 1px solid #e5e7eb; padding-bottom: 8px; }
    h2 { color: #4f46e5; margin-top: 24px; }
    h3 { color: #7e22ce; }
    p { margin-bottom: 16px; }
    ul, ol { margin-bottom: 16px; }
    pre { background-color: #f3f4f6; padding: 15px; border-radius: 5px; overflow-x: auto; }
    table { border-collapse: collapse; width: 100%; margin: 20px 0; }
    th, td { border: 1px solid #e5e7eb; padding: 8px 12px; text-align: left; }
    th { background-color: #f3f4f6; }
  </style>
</head>
<body>
  <h1>Analysis Report</h1>
"#;

/// Which list, if any, is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    None,
    Unordered,
    Ordered,
}

impl ListState {
    fn tag(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Unordered => Some("ul"),
            Self::Ordered => Some("ol"),
        }
    }
}

struct HtmlWriter {
    out: String,
    list: ListState,
}

impl HtmlWriter {
    fn close_list(&mut self) {
        if let Some(tag) = self.list.tag() {
            self.out.push_str(&format!("</{}>", tag));
        }
        self.list = ListState::None;
    }

    fn open_list(&mut self, kind: ListState) {
        if self.list != kind {
            self.close_list();
            if let Some(tag) = kind.tag() {
                self.out.push_str(&format!("<{}>", tag));
            }
            self.list = kind;
        }
    }

    fn line(&mut self, line: &str) {
        if let Some((level, title)) = parse_heading(line) {
            self.close_list();
            let tag = level.tag();
            self.out
                .push_str(&format!("<{}>{}</{}>", tag, escape_html(title), tag));
        } else if let Some(item) = parse_list_item(line) {
            let kind = match item {
                ListItem::Bullet(_) => ListState::Unordered,
                ListItem::Numbered { .. } => ListState::Ordered,
            };
            self.open_list(kind);
            self.out
                .push_str(&format!("<li>{}</li>", escape_html(item.text())));
        } else if line.trim().is_empty() {
            self.close_list();
            self.out.push_str("<br>");
        } else {
            self.close_list();
            self.out.push_str(&format!("<p>{}</p>", escape_html(line)));
        }
    }
}

/// Convert markdown to an HTML report stamped with the current local time.
pub fn to_html(markdown: &str) -> String {
    to_html_at(markdown, Local::now().naive_local())
}

/// Convert markdown to an HTML report stamped with `generated_at`.
///
/// Every list that is opened is closed again, whatever the input.
pub fn to_html_at(markdown: &str, generated_at: NaiveDateTime) -> String {
    let mut writer = HtmlWriter {
        out: String::from(DOCUMENT_HEAD),
        list: ListState::None,
    };

    for line in markdown.split('\n') {
        writer.line(line);
    }
    writer.close_list();

    let mut html = writer.out;
    html.push_str(&format!(
        "<footer>\n    <p><small>Generated on {}</small></p>\n  </footer>\n</body></html>",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html
}

/// Escape text for inclusion in HTML element content.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn body(markdown: &str) -> String {
        let html = to_html_at(markdown, fixed_time());
        let start = html.find("<h1>Analysis Report</h1>\n").unwrap() + 25;
        let end = html.find("<footer>").unwrap();
        html[start..end].to_string()
    }

    fn assert_balanced(html: &str) {
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<ol>").count(), html.matches("</ol>").count());
    }

    #[test]
    fn test_headings_and_paragraphs() {
        assert_eq!(
            body("# A\n## B\n### C\ntext"),
            "<h1>A</h1><h2>B</h2><h3>C</h3><p>text</p>"
        );
    }

    #[test]
    fn test_lists_switch_and_close() {
        assert_eq!(
            body("- a\n* b\n1. c\n2. d\n- e"),
            "<ul><li>a</li><li>b</li></ul><ol><li>c</li><li>d</li></ol><ul><li>e</li></ul>"
        );
    }

    #[test]
    fn test_blank_line_closes_list() {
        assert_eq!(body("- a\n\ntext"), "<ul><li>a</li></ul><br><p>text</p>");
    }

    #[test]
    fn test_heading_closes_list() {
        assert_eq!(body("1. a\n# H"), "<ol><li>a</li></ol><h1>H</h1>");
    }

    #[test]
    fn test_document_shell_and_footer() {
        let html = to_html_at("x", fixed_time());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Analysis Report</title>"));
        assert!(html.contains("Generated on 2025-03-15 14:30:00"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_list_tags_balanced_for_varied_inputs() {
        let inputs = [
            "- a",
            "1. a",
            "- a\n1. b",
            "1. a\n- b\n- c",
            "# h\n- a\n## h2\n1. b",
            "<ul>\n- a",
            "text <ol> inside",
            "- <ul>",
            "",
        ];
        for input in inputs {
            assert_balanced(&to_html_at(input, fixed_time()));
        }
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        assert_eq!(
            body("a <b> & \"c\""),
            "<p>a &lt;b&gt; &amp; &quot;c&quot;</p>"
        );
    }
}
