use super::thinking::THINKING_LABEL;
use super::{segments_for, RenderOptions};
use crate::models::{Message, Role, Session};
use crate::segment::Segment;
use pulldown_cmark::{html, Options, Parser};

/// Markdown to HTML. Raw HTML in the input is passed through.
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(
        text,
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS,
    );
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn message_to_html(message: &Message, options: &RenderOptions) -> String {
    let class = match (message.role, message.is_error) {
        (_, true) => "message error",
        (Role::User, false) => "message user",
        (Role::Assistant, false) => "message assistant",
    };
    let mut out = format!(
        "<section class=\"{}\" id=\"msg-{}\">\n<time>{}</time>\n",
        class,
        escape_html(&message.id),
        message.timestamp.format("%Y-%m-%d %H:%M")
    );

    match message.role {
        Role::User => {
            out.push_str(&format!(
                "<div class=\"content\" style=\"white-space: pre-wrap\">{}</div>\n",
                escape_html(&message.content)
            ));
        }
        Role::Assistant => {
            let segments = segments_for(&message.content, options)
                .into_iter()
                .filter(|segment| !segment.is_blank_text());
            for segment in segments {
                match segment {
                    Segment::Text(body) => {
                        out.push_str("<div class=\"content\">\n");
                        out.push_str(&markdown_to_html(&body));
                        out.push_str("</div>\n");
                    }
                    Segment::Thinking(body) => {
                        let open = if options.collapse_thinking { "" } else { " open" };
                        out.push_str(&format!(
                            "<details class=\"thinking\"{}>\n<summary>{}</summary>\n<pre>{}</pre>\n</details>\n",
                            open,
                            THINKING_LABEL,
                            escape_html(body.trim())
                        ));
                    }
                }
            }
        }
    }

    out.push_str("</section>\n");
    out
}

/// Standalone HTML document for one session.
pub fn session_to_html(session: &Session, options: &RenderOptions) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(&session.title)));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }\n\
         .user { background: #eef; padding: 0.5rem 1rem; border-radius: 0.5rem; }\n\
         .error { color: #b00; }\n\
         .thinking { border-left: 2px solid #66f; padding-left: 0.75rem; color: #555; }\n\
         time { font-size: 0.75rem; color: #888; }\n\
         </style>\n</head>\n<body>\n",
    );
    out.push_str(&format!(
        "<h1>{}</h1>\n<p class=\"meta\">Model: {} &middot; Last modified {}</p>\n",
        escape_html(&session.title),
        escape_html(&session.model),
        session.last_modified.format("%Y-%m-%d %H:%M")
    ));
    for message in &session.messages {
        out.push_str(&message_to_html(message, options));
    }
    out.push_str("</body>\n</html>\n");
    out
}
