pub mod highlight;
pub mod html;
pub mod markdown;
pub mod thinking;

use crate::models::{Message, Role};
use crate::segment::{segment, segment_decoded, Segment};
use colored::*;

pub use html::{markdown_to_html, session_to_html};
pub use markdown::render_markdown;
pub use thinking::render_thinking;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub collapse_thinking: bool,
    /// Split spans that only appear once escaped delimiters are decoded.
    pub resegment_escaped: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            collapse_thinking: false,
            resegment_escaped: true,
        }
    }
}

pub fn segments_for(content: &str, options: &RenderOptions) -> Vec<Segment> {
    if options.resegment_escaped {
        segment_decoded(content)
    } else {
        segment(content)
    }
}

/// Assistant output: Markdown for text segments, blocks for thinking.
pub fn render_assistant(content: &str, options: &RenderOptions) -> String {
    let blocks: Vec<String> = segments_for(content, options)
        .into_iter()
        .filter(|segment| !segment.is_blank_text())
        .map(|segment| match segment {
            Segment::Text(body) => render_markdown(&body),
            Segment::Thinking(body) => render_thinking(&body, options.collapse_thinking),
        })
        .collect();
    blocks.join("\n\n")
}

pub fn render_message(message: &Message, options: &RenderOptions) -> String {
    match message.role {
        Role::User => message.content.clone(),
        Role::Assistant if message.is_error => message
            .content
            .replace("**", "")
            .trim()
            .red()
            .to_string(),
        Role::Assistant => render_assistant(&message.content, options),
    }
}
