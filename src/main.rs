use clap::Parser;
use colored::*;
use std::fs;
use std::process;

use relaychat::api::Dispatcher;
use relaychat::cli::Args;
use relaychat::config::Config;
use relaychat::error::{ChatError, Result};
use relaychat::logging;
use relaychat::models::DEFAULT_MODEL;
use relaychat::render::session_to_html;
use relaychat::session::{FileBackend, SessionStore};
use relaychat::ui::output::{
    display_error, display_models, display_session_list, display_transcript, display_warning,
    short_id,
};
use relaychat::ui::repl;
use relaychat::ChatController;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        display_error(&e.to_string());
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // Listing models needs no config or history.
    if args.list_models {
        display_models(args.model.as_deref().unwrap_or(DEFAULT_MODEL));
        return Ok(());
    }

    let config = Config::from_env_and_args(&args)?;
    logging::init(config.verbose);

    let storage_path = match config.storage_path.clone() {
        Some(path) => path,
        None => FileBackend::default_path().ok_or_else(|| {
            ChatError::ConfigError("Could not determine a location for chat history".into())
        })?,
    };
    tracing::debug!(path = %storage_path.display(), "using chat history file");

    let store = SessionStore::open(Box::new(FileBackend::new(storage_path)));
    let dispatcher = Dispatcher::new(config.dispatch.clone())?;
    let mut controller = ChatController::new(store, dispatcher, config.model.clone());
    flush_warnings(&mut controller);

    let mut handled = false;

    if args.clear_history {
        controller.store_mut().clear();
        println!("{}", "All chat history cleared.".green());
        handled = true;
    }

    if let Some(id) = args.delete.as_deref() {
        let store = controller.store_mut();
        let full_id = store.resolve_id(id)?;
        store.delete(&full_id)?;
        println!("{}", format!("Deleted chat {}", short_id(&full_id)).green());
        handled = true;
    }

    if let Some([id, title]) = args.rename.as_deref() {
        let store = controller.store_mut();
        let full_id = store.resolve_id(id)?;
        store.rename(&full_id, title)?;
        println!("{}", format!("Renamed chat {}", short_id(&full_id)).green());
        handled = true;
    }

    if let Some(id) = args.select.as_deref() {
        let store = controller.store_mut();
        let full_id = store.resolve_id(id)?;
        store.select(&full_id)?;
        println!("{}", format!("Selected chat {}", short_id(&full_id)).green());
        handled = true;
    }

    if args.list || args.search.is_some() {
        let store = controller.store();
        let sessions = match args.search.as_deref() {
            Some(term) => store.search(term),
            None => store.list(),
        };
        display_session_list(&sessions, store.active_id());
        handled = true;
    }

    if args.new_chat {
        let session = controller.new_chat();
        println!("{}", format!("Started new chat {}", short_id(&session.id)).green());
        handled = true;
    }

    if args.show {
        match controller.store().active() {
            Some(session) => display_transcript(session, &config.render),
            None => println!("{}", "No active chat.".dimmed()),
        }
        handled = true;
    }

    if let Some(id) = args.export.as_deref() {
        export_session(&controller, id, &args, &config)?;
        handled = true;
    }

    flush_warnings(&mut controller);

    if !args.prompt.is_empty() {
        let prompt = args.prompt.join(" ");
        repl::send_and_display(&mut controller, &prompt, &config.render).await?;
        handled = true;
    }

    if args.interactive {
        repl::run(&mut controller, &config.render).await?;
        handled = true;
    }

    flush_warnings(&mut controller);

    if !handled {
        print_usage();
        process::exit(1);
    }

    Ok(())
}

fn export_session(
    controller: &ChatController,
    id: &str,
    args: &Args,
    config: &Config,
) -> Result<()> {
    let store = controller.store();
    let full_id = store.resolve_id(id)?;
    let session = store
        .get(&full_id)
        .ok_or_else(|| ChatError::SessionError(format!("No session with id '{}'", id)))?;
    let html = session_to_html(session, &config.render);

    match args.output.as_deref() {
        Some(path) => {
            fs::write(path, html)?;
            eprintln!("{}", format!("Exported chat to {}", path.display()).green());
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn flush_warnings(controller: &mut ChatController) {
    for warning in controller.take_warnings() {
        display_warning(&warning);
    }
}

fn print_usage() {
    eprintln!("{}", "Usage: rchat [OPTIONS] [PROMPT]...".red());
    eprintln!(
        "{}",
        "  -n, --new                  Start a new chat session".dimmed()
    );
    eprintln!(
        "{}",
        "  -m, --model <MODEL>        Model to use (see --models)".dimmed()
    );
    eprintln!(
        "{}",
        "  -i, --interactive          Read prompts from stdin until /quit".dimmed()
    );
    eprintln!(
        "{}",
        "  -l, --list                 List saved chat sessions".dimmed()
    );
    eprintln!(
        "{}",
        "      --select <ID>          Make a session active".dimmed()
    );
    eprintln!(
        "{}",
        "      --show                 Print the active session".dimmed()
    );
    eprintln!(
        "{}",
        "      --export <ID> [-o FILE] Export a session as HTML".dimmed()
    );
    eprintln!(
        "{}",
        "      --clear                Delete all chat history".dimmed()
    );
    eprintln!(
        "{}",
        "  -v, --verbose              Log request paths and fallbacks".dimmed()
    );
    eprintln!();
    eprintln!("{}", "Examples:".yellow());
    eprintln!("  rchat explain quantum computing");
    eprintln!("  rchat -m gpt-5 --new write a haiku about rust");
    eprintln!("  rchat -i");
}
