use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "New Chat";
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), false)
    }

    /// An assistant-side message standing in for a failed request.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), true)
    }

    fn new(role: Role, content: String, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Local::now(),
            is_error,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Local>,
    pub last_modified: DateTime<Local>,
    pub model: String,
}

impl Session {
    pub fn new(model: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![],
            created_at: now,
            last_modified: now,
            model: model.into(),
        }
    }

    pub fn touch(&mut self) {
        let now = Local::now();
        // Clock skew must not move last_modified behind creation.
        self.last_modified = now.max(self.created_at);
    }
}

/// Session title derived from the first prompt.
pub fn title_from_prompt(prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.chars().count() > TITLE_MAX_CHARS {
        let head: String = prompt.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        prompt.to_string()
    }
}
