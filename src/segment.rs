//! Splits model output into plain text and `<think>` commentary.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Markdown text. May be empty between adjacent thinking spans.
    Text(String),
    /// Inner text of a `<think>...</think>` span.
    Thinking(String),
}

impl Segment {
    pub fn body(&self) -> &str {
        match self {
            Segment::Text(body) | Segment::Thinking(body) => body,
        }
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self, Segment::Thinking(_))
    }

    /// Whitespace-only text, such as the gap between adjacent spans.
    pub fn is_blank_text(&self) -> bool {
        !self.is_thinking() && self.body().trim().is_empty()
    }
}

fn think_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII-only case folding, so the Kelvin sign (U+212A) does not match `k`.
    RE.get_or_init(|| {
        Regex::new(r"(?s)(?i-u:<think>)(.*?)(?i-u:</think>)").expect("valid think regex")
    })
}

fn escaped_delimiter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i-u)\\u003c(/?)think\\u003e").expect("valid escaped delimiter regex")
    })
}

fn escaped_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i-u)\\u003cthink\\u003e").expect("valid escaped open regex"))
}

/// Split `content` into ordered text and thinking segments.
///
/// With at least one span, a text segment precedes every span and one
/// follows the last, empty or not. Without spans the content comes back as a
/// single text segment, except that escaped delimiters (`\u003Cthink\u003E`)
/// are decoded first. The decoded text is not split again; see
/// [`segment_decoded`] for that.
pub fn segment(content: &str) -> Vec<Segment> {
    if let Some(segments) = split_spans(content) {
        return segments;
    }
    if has_escaped_delimiter(content) {
        return vec![Segment::Text(decode_escaped_delimiters(content))];
    }
    vec![Segment::Text(content.to_string())]
}

/// Like [`segment`], but spans that only appear after decoding escaped
/// delimiters are split out as well.
pub fn segment_decoded(content: &str) -> Vec<Segment> {
    if let Some(segments) = split_spans(content) {
        return segments;
    }
    if has_escaped_delimiter(content) {
        let decoded = decode_escaped_delimiters(content);
        return split_spans(&decoded).unwrap_or_else(|| vec![Segment::Text(decoded)]);
    }
    vec![Segment::Text(content.to_string())]
}

pub fn has_escaped_delimiter(content: &str) -> bool {
    escaped_open_regex().is_match(content)
}

/// Turn `\u003Cthink\u003E` / `\u003C/think\u003E` back into tags.
pub fn decode_escaped_delimiters(content: &str) -> String {
    escaped_delimiter_regex()
        .replace_all(content, "<${1}think>")
        .into_owned()
}

fn split_spans(content: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in think_regex().captures_iter(content) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        segments.push(Segment::Text(content[last_end..whole.start()].to_string()));
        segments.push(Segment::Thinking(inner.as_str().to_string()));
        last_end = whole.end();
    }

    if segments.is_empty() {
        return None;
    }
    segments.push(Segment::Text(content[last_end..].to_string()));
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_handles_lowercase_hex() {
        let decoded = decode_escaped_delimiters("\\u003cthink\\u003ex\\u003c/think\\u003e");
        assert_eq!(decoded, "<think>x</think>");
    }

    #[test]
    fn test_closing_escape_alone_is_not_a_trigger() {
        assert!(!has_escaped_delimiter("only \\u003C/think\\u003E here"));
    }
}
