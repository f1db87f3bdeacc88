mod catalog;
mod session;

pub use catalog::{is_known_model, AVAILABLE_MODELS, DEFAULT_MODEL};
pub use session::{title_from_prompt, Message, Role, Session, DEFAULT_TITLE, TITLE_MAX_CHARS};
