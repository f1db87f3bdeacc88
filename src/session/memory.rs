use super::storage::{SessionBackend, StoreSnapshot};
use crate::error::{ChatError, Result};
use std::sync::{Arc, Mutex};

/// In-process backend. Clones share the same slot, so a test can keep a
/// handle and inspect what the store wrote.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<StoreSnapshot>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        let backend = Self::default();
        if let Ok(mut slot) = backend.slot.lock() {
            *slot = Some(snapshot);
        }
        backend
    }

    /// Make subsequent saves fail, as a full disk or exceeded quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    pub fn saved(&self) -> Option<StoreSnapshot> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ChatError::PersistenceError("memory backend poisoned".into()))?;
        Ok(slot.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let failing = self.fail_writes.lock().map(|flag| *flag).unwrap_or(false);
        if failing {
            return Err(ChatError::PersistenceError("storage quota exceeded".into()));
        }
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ChatError::PersistenceError("memory backend poisoned".into()))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }
}
