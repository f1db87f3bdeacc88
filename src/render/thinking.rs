use colored::*;

pub const THINKING_LABEL: &str = "Thought Process";

/// A thinking span as a labelled block with a gutter. Collapsed blocks show
/// only the label and how many lines are hidden.
pub fn render_thinking(body: &str, collapsed: bool) -> String {
    let body = body.trim_matches(|c| c == '\n' || c == '\r');
    let line_count = if body.trim().is_empty() {
        0
    } else {
        body.lines().count()
    };

    if collapsed {
        let hidden = match line_count {
            1 => "1 line hidden".to_string(),
            n => format!("{} lines hidden", n),
        };
        return format!(
            "{} {}",
            format!("▸ {}", THINKING_LABEL).magenta(),
            format!("({})", hidden).dimmed()
        );
    }

    let mut output = format!("▾ {}", THINKING_LABEL).magenta().to_string();
    if line_count == 0 {
        return output;
    }
    for line in body.lines() {
        output.push('\n');
        output.push_str(&"│ ".magenta().to_string());
        output.push_str(&line.dimmed().italic().to_string());
    }
    output
}
