use crate::error::Result;
use crate::models::Session;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

/// The whole persisted collection. Rewritten on every mutation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub active_session_id: Option<String>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// Trait for session persistence backends
pub trait SessionBackend: Send + Sync {
    /// Load the last saved snapshot, or `None` when nothing was saved yet
    fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}
