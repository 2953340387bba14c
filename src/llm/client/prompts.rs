//! Default prompts for text and image analysis.

/// Prompt for structured text analysis. `{content}` is replaced by the input.
pub const TEXT_ANALYSIS_PROMPT: &str = "Analyze the following data and provide insights in JSON format with sections for summary, key_points, and recommendations:\n\n{content}";

/// Prompt for streamed narrative analysis. `{content}` is replaced by the input.
pub const STREAMING_ANALYSIS_PROMPT: &str = "Analyze the following data and provide a well-structured analysis with clear sections. Include an executive summary, key insights, detailed analysis, and recommendations. Format your response in a way that's easy to read and visually organize:\n\n{content}";

/// Appended to caller-supplied image instructions.
pub const IMAGE_THOROUGHNESS_SUFFIX: &str = "\n\nPlease be extremely thorough and provide a comprehensive analysis with multiple sections covering all aspects of the image.";

/// Prompt for image analysis when the caller gives no instructions.
pub const DEFAULT_IMAGE_PROMPT: &str = r#"
Provide an extremely detailed and comprehensive analysis of this image. Include:

1. DETAILED VISUAL DESCRIPTION: Describe everything visible in the image with precision - objects, people, text, colors, lighting, perspective, and spatial relationships.

2. CONTEXT ANALYSIS: Identify the setting, time period, purpose, and potential significance of the image.

3. TECHNICAL ASSESSMENT: Evaluate image quality, composition, focal points, and any notable photographic or artistic techniques.

4. TEXT EXTRACTION: Transcribe ALL text visible in the image verbatim, including small print, labels, signs, or watermarks.

5. DATA INTERPRETATION: If charts, graphs, or data visualizations are present, provide detailed interpretation of the data, trends, and implications.

6. OBJECT IDENTIFICATION: List and describe all distinct objects, brands, logos, or recognizable elements.

7. SUBJECT ANALYSIS: For people or living subjects, describe expressions, attire, activities, and apparent relationships.

8. CULTURAL/HISTORICAL CONTEXT: Note any cultural, historical, or social significance.

9. ANOMALIES OR SPECIAL FEATURES: Highlight anything unusual, unique, or particularly noteworthy.

10. PROFESSIONAL INSIGHTS: Provide domain-specific observations relevant to the image content (e.g., architectural details, scientific phenomena, artistic techniques).

Format your response with clear section headings and bullet points where appropriate for maximum readability.
"#;
