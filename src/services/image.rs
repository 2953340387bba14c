//! Image input and output clean-up for image analysis.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::llm::{DEFAULT_IMAGE_PROMPT, IMAGE_THOROUGHNESS_SUFFIX};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s*(.*)$").unwrap());

/// Turn whatever the caller sent into a `data:image/...;base64,` URL.
///
/// Full image data URLs pass through. Otherwise the payload after the first
/// comma is used (a data URL with a non-image MIME type), or, with no comma,
/// the whole string with whitespace removed; it is then labelled as JPEG.
pub fn normalize_image_data_url(image: &str) -> String {
    if image.starts_with("data:image") {
        return image.to_string();
    }

    let base64: Cow<'_, str> = if image.contains(',') {
        Cow::Borrowed(image.split(',').nth(1).unwrap_or_default())
    } else {
        Cow::Owned(image.chars().filter(|c| !c.is_whitespace()).collect())
    };
    format!("data:image/jpeg;base64,{}", base64)
}

/// Prompt for an image analysis request.
pub fn image_prompt(instructions: Option<&str>) -> String {
    match instructions.map(str::trim) {
        Some(text) if !text.is_empty() => format!("{}{}", text, IMAGE_THOROUGHNESS_SUFFIX),
        _ => DEFAULT_IMAGE_PROMPT.to_string(),
    }
}

/// Flatten every heading to level 1 so each section of an image analysis
/// stands on its own.
pub fn normalize_headings(analysis: &str) -> String {
    HEADING_RE
        .replace_all(analysis, |caps: &regex::Captures<'_>| {
            format!("# {}", caps[1].trim())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_passes_through() {
        let url = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(normalize_image_data_url(url), url);
    }

    #[test]
    fn test_raw_base64_whitespace_removed() {
        assert_eq!(
            normalize_image_data_url("iVBO Rw0K\nGgo="),
            "data:image/jpeg;base64,iVBORw0KGgo="
        );
    }

    #[test]
    fn test_comma_separated_payload() {
        assert_eq!(
            normalize_image_data_url("data:application/octet-stream;base64,AAAA"),
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_prompt_selection() {
        assert_eq!(image_prompt(None), DEFAULT_IMAGE_PROMPT);
        assert_eq!(image_prompt(Some("   ")), DEFAULT_IMAGE_PROMPT);

        let prompt = image_prompt(Some("Count the cars"));
        assert!(prompt.starts_with("Count the cars\n\nPlease be extremely thorough"));
    }

    #[test]
    fn test_headings_flattened() {
        let analysis = "## Overview\ntext\n###   Details  \n- item\n#Tight";
        assert_eq!(
            normalize_headings(analysis),
            "# Overview\ntext\n# Details\n- item\n# Tight"
        );
    }
}
