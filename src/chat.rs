use crate::api::{Dispatcher, HttpTransport, Transport};
use crate::config::validate_model;
use crate::error::{ChatError, Result};
use crate::models::{title_from_prompt, Message, Session};
use crate::session::SessionStore;
use tracing::{debug, warn};

/// Owns the chat state and drives one send at a time.
///
/// `send` borrows the controller mutably for the whole request, so a second
/// prompt cannot start until the first reply (or failure) is recorded.
pub struct ChatController<T: Transport = HttpTransport> {
    store: SessionStore,
    dispatcher: Dispatcher<T>,
    model: String,
}

impl<T: Transport> ChatController<T> {
    pub fn new(store: SessionStore, dispatcher: Dispatcher<T>, model: impl Into<String>) -> Self {
        Self {
            store,
            dispatcher,
            model: model.into(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        validate_model(model)?;
        self.model = model.to_string();
        Ok(())
    }

    /// Start an empty session with the current model and make it active.
    pub fn new_chat(&mut self) -> Session {
        self.store.create(&self.model)
    }

    /// Send `prompt` in the active session, creating one if needed.
    ///
    /// Returns the message appended as the reply. Request failures do not
    /// surface as `Err`: they become an error-flagged message carrying the
    /// diagnostic, so the session stays usable.
    pub async fn send(&mut self, prompt: &str) -> Result<Message> {
        if prompt.trim().is_empty() {
            return Err(ChatError::Other("Cannot send an empty prompt".into()));
        }

        let session_id = match self.store.active() {
            Some(session) => session.id.clone(),
            None => self.new_chat().id,
        };
        let first_message = self
            .store
            .get(&session_id)
            .map(|s| s.messages.is_empty())
            .unwrap_or(true);

        self.store.append_message(&session_id, Message::user(prompt))?;
        if first_message {
            self.store.rename(&session_id, &title_from_prompt(prompt))?;
        }

        debug!(session = %session_id, model = %self.model, "sending prompt");
        let reply = match self.dispatcher.send(prompt, &self.model).await {
            Ok(text) => Message::assistant(text),
            Err(e) => {
                warn!(session = %session_id, error = %e, "prompt failed");
                Message::error(self.dispatcher.describe_failure(&e))
            }
        };

        self.store.append_message(&session_id, reply.clone())?;
        Ok(reply)
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        self.store.take_warnings()
    }
}
