use crate::models::{Message, Role, Session, AVAILABLE_MODELS};
use crate::render::{render_message, RenderOptions};
use colored::*;

/// Characters of the session id shown in listings. Any unique prefix selects.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn message_header(message: &Message) -> String {
    let time = message.timestamp.format("%H:%M").to_string();
    let who = match (message.role, message.is_error) {
        (Role::User, _) => "You".green().bold(),
        (Role::Assistant, true) => "Error".red().bold(),
        (Role::Assistant, false) => "Assistant".magenta().bold(),
    };
    format!("{} {}", who, time.dimmed())
}

/// Display one message with its header line
pub fn display_message(message: &Message, options: &RenderOptions) {
    println!("{}", message_header(message));
    println!("{}", render_message(message, options));
    println!();
}

/// Display every message of a session in order
pub fn display_transcript(session: &Session, options: &RenderOptions) {
    println!(
        "{} {}",
        session.title.bold(),
        format!("({}, {})", session.model, short_id(&session.id)).dimmed()
    );
    println!();
    if session.messages.is_empty() {
        println!("{}", "No messages yet.".dimmed());
        return;
    }
    for message in &session.messages {
        display_message(message, options);
    }
}

pub fn format_session_line(session: &Session, active: bool) -> String {
    let marker = if active { "*".green().bold() } else { " ".normal() };
    let count = session.messages.len();
    format!(
        "{} {}  {}  {}",
        marker,
        short_id(&session.id).cyan(),
        session.title,
        format!(
            "({}, {} message{}, {})",
            session.model,
            count,
            if count == 1 { "" } else { "s" },
            session.last_modified.format("%Y-%m-%d %H:%M")
        )
        .dimmed()
    )
}

/// Display sessions in the order given, marking the active one
pub fn display_session_list(sessions: &[&Session], active_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No chat history yet.".dimmed());
        return;
    }
    println!("{}", "Recent Chats".bold());
    for session in sessions {
        let active = active_id == Some(session.id.as_str());
        println!("{}", format_session_line(session, active));
    }
}

pub fn display_models(current: &str) {
    println!("{}", "Available models".bold());
    for model in AVAILABLE_MODELS {
        if *model == current {
            println!("{} {}", "✓".green(), model.cyan());
        } else {
            println!("  {}", model);
        }
    }
}

pub fn display_warning(warning: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), warning.yellow());
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

pub fn display_waiting(model: &str) {
    eprintln!("{}", format!("Waiting for {}...", model).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_session_line_marks_active() {
        colored::control::set_override(false);
        let mut session = Session::new("grok-4");
        session.title = "Quantum basics".into();
        session.messages.push(Message::user("hi"));
        let line = format_session_line(&session, true);
        assert!(line.starts_with("* "));
        assert!(line.contains("Quantum basics"));
        assert!(line.contains("grok-4, 1 message,"));

        let line = format_session_line(&session, false);
        assert!(line.starts_with("  "));
    }
}
