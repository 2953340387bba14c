//! Framing of streamed completion bodies.
//!
//! A [`FrameDecoder`] turns decoded body text into payload text. Frames may
//! straddle network chunks, so decoders buffer until a frame is complete.

use serde_json::Value;

/// Extracts payload text from decoded stream text.
pub trait FrameDecoder {
    /// Feed the next piece of decoded text, appending any complete payload
    /// to `out`.
    fn feed(&mut self, text: &str, out: &mut String);

    /// The stream ended; append whatever is still buffered.
    fn flush(&mut self, out: &mut String);
}

/// The body is the payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawText;

impl FrameDecoder for RawText {
    fn feed(&mut self, text: &str, out: &mut String) {
        out.push_str(text);
    }

    fn flush(&mut self, _out: &mut String) {}
}

/// Newline-delimited frames.
///
/// Each complete line is one of:
/// - `data: <json>` or a bare JSON object carrying a content delta
/// - `data: [DONE]`, a blank line, an `event:` line or a `:` comment (skipped)
/// - a bare JSON object with completion fields but no text (skipped)
/// - `data: <text>` (the text is the payload; consecutive `data:` lines of
///   one event are joined with `\n`)
/// - anything else: plain text, kept verbatim with its newline
#[derive(Debug, Default, Clone)]
pub struct LineFrames {
    partial: String,
    /// A plain-text `data:` line was emitted in the current event.
    in_data_text: bool,
}

impl FrameDecoder for LineFrames {
    fn feed(&mut self, text: &str, out: &mut String) {
        self.partial.push_str(text);
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            self.append_line(&line[..line.len() - 1], true, out);
        }
    }

    fn flush(&mut self, out: &mut String) {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.append_line(&line, false, out);
        }
    }
}

impl LineFrames {
    fn append_line(&mut self, line: &str, terminated: bool, out: &mut String) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            // Blank line ends an SSE event.
            self.in_data_text = false;
            return;
        }
        if line.starts_with(':') || line.starts_with("event:") {
            return;
        }

        if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            if data == "[DONE]" {
                return;
            }
            match json_payload(data) {
                Some(payload) => out.push_str(&payload),
                None if is_json_object(data) => {}
                None => {
                    // Multi-line data of one event joins with newlines.
                    if self.in_data_text {
                        out.push('\n');
                    }
                    out.push_str(data);
                    self.in_data_text = true;
                }
            }
            return;
        }

        match json_payload(line) {
            Some(payload) => out.push_str(&payload),
            None if is_protocol_frame(line) => {}
            None => {
                out.push_str(line);
                if terminated {
                    out.push('\n');
                }
            }
        }
    }
}

/// Keys that mark a bare JSON line as a completion frame rather than text.
const FRAME_KEYS: [&str; 7] = [
    "choices", "message", "response", "content", "text", "done", "object",
];

fn is_json_object(s: &str) -> bool {
    matches!(serde_json::from_str::<Value>(s), Ok(Value::Object(_)))
}

/// A JSON object carrying completion-protocol fields but no text.
fn is_protocol_frame(s: &str) -> bool {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => FRAME_KEYS.iter().any(|k| map.contains_key(*k)),
        _ => false,
    }
}

/// Pull delta text out of one JSON frame.
///
/// Understands OpenAI-style `choices[0].delta.content` and
/// `choices[0].message.content`, Ollama-style `message.content` and
/// `response`, and flat `content` / `text` fields.
fn json_payload(s: &str) -> Option<String> {
    let value: Value = serde_json::from_str(s).ok()?;
    let obj = value.as_object()?;

    let choice = obj
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|c| c.first());

    let candidates = [
        choice.and_then(|c| c.pointer("/delta/content")),
        choice.and_then(|c| c.pointer("/message/content")),
        choice.and_then(|c| c.get("text")),
        value.pointer("/message/content"),
        obj.get("response"),
        obj.get("content"),
        obj.get("text"),
    ];

    let payload = candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    payload
}
