use crate::api::models::ChatReply;
use crate::error::{ChatError, Result};

/// Pull the `response` text out of a successful body.
///
/// Unparseable bodies, a missing field, a non-string field and an empty string
/// all count as an empty response.
pub fn extract_response(body: &str) -> Result<String> {
    let reply: ChatReply = serde_json::from_str(body).map_err(|_| ChatError::EmptyResponse)?;
    match reply.response {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ChatError::EmptyResponse),
    }
}
