use colored::*;
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use terminal_size::{terminal_size, Width};

const THEME: &str = "Solarized (dark)";
const MIN_FRAME_WIDTH: usize = 20;
const MAX_FRAME_WIDTH: usize = 80;
const FALLBACK_FRAME_WIDTH: usize = 60;

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Syntax-highlight `code` for a 24-bit terminal. Returns the code
    /// unchanged when colors are off or the language is unknown to syntect.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        if !colored::control::SHOULD_COLORIZE.should_colorize() {
            return code.to_string();
        }
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }
        if !output.is_empty() {
            output.push_str("\x1b[0m");
        }

        output
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Loading syntect's defaults is slow, so one instance serves the process.
pub fn shared() -> &'static Highlighter {
    static HIGHLIGHTER: OnceLock<Highlighter> = OnceLock::new();
    HIGHLIGHTER.get_or_init(Highlighter::new)
}

pub fn frame_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(FALLBACK_FRAME_WIDTH)
        .clamp(MIN_FRAME_WIDTH, MAX_FRAME_WIDTH)
}

/// A fenced code block inside the `┌─[lang]` / `└─` frame.
pub fn render_code_block(code: &str, lang: Option<&str>) -> String {
    let width = frame_width();
    let label = lang.filter(|l| !l.is_empty()).unwrap_or("code");
    let rule_len = width.saturating_sub(label.chars().count() + 4);

    let mut output = format!(
        "{}[{}]{}\n",
        "┌─".dimmed(),
        label.cyan(),
        "─".repeat(rule_len).dimmed()
    );
    let body = shared().highlight(code, lang);
    output.push_str(&body);
    if !code.is_empty() && !code.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(&format!("└{}", "─".repeat(width - 1)).dimmed().to_string());
    output
}
