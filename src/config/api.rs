use crate::api::RelayProxy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub direct_timeout_ms: Option<u64>,
    #[serde(default)]
    pub relay_timeout_secs: Option<u64>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub fallback_on_empty_response: Option<bool>,
    /// Replaces the built-in relay chain when present. An empty list disables relays.
    #[serde(default)]
    pub relays: Option<Vec<RelayProxy>>,
}
