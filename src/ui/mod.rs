pub mod output;
pub mod repl;

pub use output::{
    display_error, display_message, display_models, display_session_list, display_transcript,
    display_waiting, display_warning, short_id,
};
