use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "rchat")]
#[command(
    about = "Terminal chat client with relay fallback and local chat history",
    long_about = None
)]
pub struct Args {
    #[arg(short = 'n', long = "new", help = "Start a new chat session")]
    pub new_chat: bool,

    #[arg(short = 'm', long = "model", help = "Model to use (see --models)")]
    pub model: Option<String>,

    #[arg(
        short = 'i',
        long = "interactive",
        help = "Read prompts from stdin until /quit"
    )]
    pub interactive: bool,

    #[arg(short = 'l', long = "list", help = "List saved chat sessions")]
    pub list: bool,

    #[arg(long = "search", value_name = "TERM", help = "List sessions whose title contains TERM")]
    pub search: Option<String>,

    #[arg(long = "select", value_name = "ID", help = "Make a session active (id or unique prefix)")]
    pub select: Option<String>,

    #[arg(
        long = "rename",
        num_args = 2,
        value_names = ["ID", "TITLE"],
        help = "Rename a session"
    )]
    pub rename: Option<Vec<String>>,

    #[arg(long = "delete", value_name = "ID", help = "Delete a session")]
    pub delete: Option<String>,

    #[arg(long = "clear", help = "Delete all chat history")]
    pub clear_history: bool,

    #[arg(long = "show", help = "Print the active session transcript")]
    pub show: bool,

    #[arg(long = "export", value_name = "ID", help = "Export a session as HTML")]
    pub export: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write --export output to FILE instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long = "models", help = "List available models")]
    pub list_models: bool,

    #[arg(
        long = "api-endpoint",
        help = "Override the chat endpoint (e.g., http://localhost:9100/chat/get)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "collapse-thinking", help = "Show thinking blocks collapsed")]
    pub collapse_thinking: bool,

    #[arg(short = 'v', long = "verbose", help = "Log request paths and fallbacks")]
    pub verbose: bool,

    #[arg(help = "Prompt to send")]
    pub prompt: Vec<String>,
}
