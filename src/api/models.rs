use serde::Deserialize;

/// Body returned by the chat endpoint.
#[derive(Deserialize, Debug)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}
