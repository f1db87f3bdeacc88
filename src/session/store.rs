use super::memory::MemoryBackend;
use super::storage::{SessionBackend, StoreSnapshot, SNAPSHOT_VERSION};
use crate::error::{ChatError, Result};
use crate::models::{Message, Session};
use std::sync::Arc;
use tracing::debug;

/// Owns every session plus the active reference.
///
/// Readers get shared snapshots; each mutation edits a private copy, swaps it
/// in, then writes the whole collection through the backend. A failed write
/// never fails the mutation: it is logged and queued for [`take_warnings`].
///
/// [`take_warnings`]: SessionStore::take_warnings
pub struct SessionStore {
    sessions: Arc<Vec<Session>>,
    active: Option<String>,
    backend: Box<dyn SessionBackend>,
    warnings: Vec<String>,
}

impl SessionStore {
    pub fn open(backend: Box<dyn SessionBackend>) -> Self {
        let mut warnings = Vec::new();
        let snapshot = match backend.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => StoreSnapshot::default(),
            Err(e) => {
                debug!(error = %e, "failed to load chat history, starting empty");
                warnings.push(format!("Could not load chat history: {}", e));
                StoreSnapshot::default()
            }
        };

        // A dangling active id (session deleted by hand) is dropped.
        let active = snapshot
            .active_session_id
            .filter(|id| snapshot.sessions.iter().any(|s| &s.id == id));

        debug!(sessions = snapshot.sessions.len(), "session store opened");
        Self {
            sessions: Arc::new(snapshot.sessions),
            active,
            backend,
            warnings,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()))
    }

    /// Sessions ordered by last modification, newest first.
    pub fn list(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.iter().collect();
        sessions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        sessions
    }

    /// Case-insensitive title filter, same order as [`SessionStore::list`].
    pub fn search(&self, term: &str) -> Vec<&Session> {
        let needle = term.to_lowercase();
        self.list()
            .into_iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Read-only view of the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Session>> {
        Arc::clone(&self.sessions)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Full id for an exact id or a unique prefix of one.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<String> {
        if let Some(session) = self.get(id_or_prefix) {
            return Ok(session.id.clone());
        }
        if id_or_prefix.is_empty() {
            return Err(unknown_session(id_or_prefix));
        }
        let matches: Vec<&Session> = self
            .sessions
            .iter()
            .filter(|s| s.id.starts_with(id_or_prefix))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(unknown_session(id_or_prefix)),
            _ => Err(ChatError::SessionError(format!(
                "Session id prefix '{}' is ambiguous ({} matches)",
                id_or_prefix,
                matches.len()
            ))),
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Create an empty session and make it active.
    pub fn create(&mut self, model: &str) -> Session {
        let session = Session::new(model);
        let created = session.clone();
        self.apply(move |sessions, active| {
            *active = Some(session.id.clone());
            sessions.insert(0, session);
        });
        created
    }

    pub fn append_message(&mut self, session_id: &str, message: Message) -> Result<()> {
        self.commit(|sessions, _| {
            let session = find_mut(sessions, session_id)?;
            session.messages.push(message);
            session.touch();
            Ok(())
        })
    }

    pub fn rename(&mut self, session_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::SessionError("Title cannot be empty".into()));
        }
        self.commit(|sessions, _| {
            let session = find_mut(sessions, session_id)?;
            session.title = title.to_string();
            session.touch();
            Ok(())
        })
    }

    /// Remove a session. Clears the active reference only if it pointed here.
    pub fn delete(&mut self, session_id: &str) -> Result<()> {
        self.commit(|sessions, active| {
            let before = sessions.len();
            sessions.retain(|s| s.id != session_id);
            if sessions.len() == before {
                return Err(unknown_session(session_id));
            }
            if active.as_deref() == Some(session_id) {
                *active = None;
            }
            Ok(())
        })
    }

    pub fn select(&mut self, session_id: &str) -> Result<()> {
        if self.get(session_id).is_none() {
            return Err(unknown_session(session_id));
        }
        self.commit(|_, active| {
            *active = Some(session_id.to_string());
            Ok(())
        })
    }

    pub fn clear(&mut self) {
        self.apply(|sessions, active| {
            sessions.clear();
            *active = None;
        });
    }

    /// Non-fatal problems (failed writes, unreadable history) since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn commit<T, F>(&mut self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Session>, &mut Option<String>) -> Result<T>,
    {
        let mut next = (*self.sessions).clone();
        let mut next_active = self.active.clone();
        let value = mutate(&mut next, &mut next_active)?;
        self.install(next, next_active);
        Ok(value)
    }

    fn apply<T, F>(&mut self, mutate: F) -> T
    where
        F: FnOnce(&mut Vec<Session>, &mut Option<String>) -> T,
    {
        let mut next = (*self.sessions).clone();
        let mut next_active = self.active.clone();
        let value = mutate(&mut next, &mut next_active);
        self.install(next, next_active);
        value
    }

    fn install(&mut self, sessions: Vec<Session>, active: Option<String>) {
        self.sessions = Arc::new(sessions);
        self.active = active;
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION,
            active_session_id: self.active.clone(),
            sessions: (*self.sessions).clone(),
        };
        if let Err(e) = self.backend.save(&snapshot) {
            debug!(error = %e, "failed to save chat history");
            self.warnings
                .push(format!("Chat history could not be saved: {}", e));
        }
    }
}

fn find_mut<'a>(sessions: &'a mut [Session], session_id: &str) -> Result<&'a mut Session> {
    sessions
        .iter_mut()
        .find(|s| s.id == session_id)
        .ok_or_else(|| unknown_session(session_id))
}

fn unknown_session(session_id: &str) -> ChatError {
    ChatError::SessionError(format!("No session with id '{}'", session_id))
}
