use crate::api::Transport;
use crate::chat::ChatController;
use crate::error::Result;
use crate::render::RenderOptions;
use crate::ui::output::{
    display_error, display_message, display_models, display_session_list, display_transcript,
    display_waiting, display_warning, short_id,
};
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    New,
    Model(String),
    Models,
    List,
    Select(String),
    Show,
    Prompt(String),
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Prompt(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match (name, arg) {
        ("quit" | "exit" | "q", _) => ReplCommand::Quit,
        ("help" | "?", _) => ReplCommand::Help,
        ("new", _) => ReplCommand::New,
        ("models", _) => ReplCommand::Models,
        ("model", "") => ReplCommand::Models,
        ("model", model) => ReplCommand::Model(model.to_string()),
        ("list", _) => ReplCommand::List,
        ("select", id) if !id.is_empty() => ReplCommand::Select(id.to_string()),
        ("show", _) => ReplCommand::Show,
        _ => ReplCommand::Unknown(trimmed.to_string()),
    }
}

fn print_help() {
    println!("{}", "Commands".bold());
    println!("  /new            start a new chat");
    println!("  /model <id>     switch model (/models to list)");
    println!("  /list           list saved chats");
    println!("  /select <id>    switch to a saved chat");
    println!("  /show           print the current chat");
    println!("  /quit           exit");
}

/// Send one prompt and print the reply plus any storage warnings.
pub async fn send_and_display<T: Transport>(
    controller: &mut ChatController<T>,
    prompt: &str,
    options: &RenderOptions,
) -> Result<()> {
    display_waiting(controller.model());
    let reply = controller.send(prompt).await?;
    display_message(&reply, options);
    for warning in controller.take_warnings() {
        display_warning(&warning);
    }
    Ok(())
}

/// Interactive loop over stdin lines until `/quit` or end of input.
pub async fn run<T: Transport>(
    controller: &mut ChatController<T>,
    options: &RenderOptions,
) -> Result<()> {
    println!(
        "{}",
        format!(
            "Chatting with {}. Type /help for commands, /quit to exit.",
            controller.model()
        )
        .dimmed()
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Help => print_help(),
            ReplCommand::New => {
                let session = controller.new_chat();
                println!("{}", format!("New chat {}", short_id(&session.id)).dimmed());
            }
            ReplCommand::Models => display_models(controller.model()),
            ReplCommand::Model(model) => match controller.set_model(&model) {
                Ok(()) => println!("{}", format!("Model set to {}", model).dimmed()),
                Err(e) => display_error(&e.to_string()),
            },
            ReplCommand::List => {
                let store = controller.store();
                display_session_list(&store.list(), store.active_id());
            }
            ReplCommand::Select(id) => {
                let store = controller.store_mut();
                match store.resolve_id(&id).and_then(|full| store.select(&full)) {
                    Ok(()) => {
                        if let Some(session) = controller.store().active() {
                            display_transcript(session, options);
                        }
                    }
                    Err(e) => display_error(&e.to_string()),
                }
            }
            ReplCommand::Show => match controller.store().active() {
                Some(session) => display_transcript(session, options),
                None => println!("{}", "No active chat.".dimmed()),
            },
            ReplCommand::Unknown(command) => {
                display_error(&format!("Unknown command '{}'. Try /help.", command))
            }
            ReplCommand::Prompt(prompt) => {
                if let Err(e) = send_and_display(controller, &prompt, options).await {
                    display_error(&e.to_string());
                }
            }
        }

        for warning in controller.take_warnings() {
            display_warning(&warning);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_prompt() {
        assert_eq!(
            parse_command("explain quantum computing\n"),
            ReplCommand::Prompt("explain quantum computing".into())
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_command("/quit"), ReplCommand::Quit);
        assert_eq!(parse_command("  /new "), ReplCommand::New);
        assert_eq!(parse_command("/model gpt-5"), ReplCommand::Model("gpt-5".into()));
        assert_eq!(parse_command("/model"), ReplCommand::Models);
        assert_eq!(parse_command("/select 1a2b"), ReplCommand::Select("1a2b".into()));
    }

    #[test]
    fn test_blank_and_unknown() {
        assert_eq!(parse_command("   "), ReplCommand::Empty);
        assert_eq!(parse_command("/frobnicate"), ReplCommand::Unknown("/frobnicate".into()));
        assert_eq!(parse_command("/select"), ReplCommand::Unknown("/select".into()));
    }
}
