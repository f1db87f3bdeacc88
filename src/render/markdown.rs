use super::highlight::{frame_width, render_code_block};
use colored::*;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Render Markdown as styled terminal text.
pub fn render_markdown(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut renderer = TerminalRenderer::default();
    for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct TerminalRenderer {
    out: String,
    bold: usize,
    italic: usize,
    strike: usize,
    heading: Option<HeadingLevel>,
    /// One entry per open list: next number for ordered lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    links: Vec<String>,
    code_block: Option<(Option<String>, String)>,
    mid_line: bool,
}

impl TerminalRenderer {
    fn handle(&mut self, event: Event<'_>) {
        if let Some((_, code)) = self.code_block.as_mut() {
            match event {
                Event::Text(text) => {
                    code.push_str(&text);
                    return;
                }
                Event::End(TagEnd::CodeBlock) => {}
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let styled = format!("`{}`", code).cyan().to_string();
                self.write_styled(&styled);
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.blank_line();
                let rule = "─".repeat(frame_width()).dimmed().to_string();
                self.write_styled(&rule);
                self.blank_line();
            }
            Event::TaskListMarker(checked) => {
                self.write_styled(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.block_start(),
            Tag::Heading { level, .. } => {
                self.blank_line();
                self.heading = Some(level);
            }
            Tag::BlockQuote(_) => {
                self.block_start();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.block_start();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code_block = Some((lang, String::new()));
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.block_start();
                } else if self.mid_line {
                    self.newline();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                if self.mid_line {
                    self.newline();
                }
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.write_prefix(depth);
                self.out.push_str(&marker);
                self.mid_line = true;
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Strikethrough => self.strike += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            Tag::Image { .. } => self.write_styled("[image: "),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.block_end(),
            TagEnd::Heading(_) => {
                self.heading = None;
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.block_end();
            }
            TagEnd::CodeBlock => {
                if let Some((lang, code)) = self.code_block.take() {
                    let block = render_code_block(&code, lang.as_deref());
                    for (i, line) in block.lines().enumerate() {
                        if i > 0 {
                            self.newline();
                        }
                        self.write_styled(line);
                    }
                }
                self.block_end();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => {
                if self.mid_line {
                    self.newline();
                }
            }
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Strikethrough => self.strike = self.strike.saturating_sub(1),
            TagEnd::Link => {
                if let Some(url) = self.links.pop() {
                    if !url.is_empty() {
                        let styled = format!(" <{}>", url).dimmed().to_string();
                        self.write_styled(&styled);
                    }
                }
            }
            TagEnd::Image => self.write_styled("]"),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if !line.is_empty() {
                let styled = self.style(line);
                self.write_styled(&styled);
            }
        }
    }

    fn style(&self, text: &str) -> String {
        let mut styled = text.normal();
        if let Some(level) = self.heading {
            styled = styled.bold();
            if level == HeadingLevel::H1 {
                styled = styled.underline();
            }
        }
        if self.bold > 0 {
            styled = styled.bold();
        }
        if self.italic > 0 {
            styled = styled.italic();
        }
        if self.strike > 0 {
            styled = styled.strikethrough();
        }
        if !self.links.is_empty() {
            styled = styled.blue();
        }
        styled.to_string()
    }

    fn write_styled(&mut self, styled: &str) {
        if !self.mid_line {
            self.write_prefix(self.lists.len());
            self.mid_line = true;
        }
        self.out.push_str(styled);
    }

    /// Quote gutters plus list indentation for a fresh line.
    fn write_prefix(&mut self, list_depth: usize) {
        for _ in 0..self.quote_depth {
            self.out.push_str(&"│ ".dimmed().to_string());
        }
        self.out.push_str(&"  ".repeat(list_depth));
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.mid_line = false;
    }

    fn blank_line(&mut self) {
        if self.out.is_empty() {
            return;
        }
        if self.mid_line {
            self.newline();
        }
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn block_start(&mut self) {
        if self.lists.is_empty() {
            self.blank_line();
        } else if self.mid_line {
            self.newline();
        }
    }

    fn block_end(&mut self) {
        if self.lists.is_empty() && self.quote_depth == 0 {
            self.blank_line();
        } else if self.mid_line {
            self.newline();
        }
    }

    fn finish(self) -> String {
        self.out.trim_end_matches('\n').to_string()
    }
}
