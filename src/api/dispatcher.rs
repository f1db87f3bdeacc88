use crate::api::response::extract_response;
use crate::api::strategy::{RelayProxy, Strategy};
use crate::api::transport::{HttpTransport, Transport};
use crate::error::{ChatError, Result};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_ENDPOINT: &str = "http://64.227.155.90:9100/chat/get";
pub const DEFAULT_DIRECT_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(30);

pub const CONNECTION_FAILURE_REASON: &str = "Unable to connect to server after multiple attempts";
pub const MIXED_CONTENT_NOTE: &str =
    "**Note**: Mixed Content blocking is likely. Attempted secure proxies but they may be busy.";

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub endpoint: String,
    pub direct_timeout: Duration,
    pub relay_timeout: Duration,
    pub relays: Vec<RelayProxy>,
    /// Origin the client presents itself as. Only used for the mixed-content note.
    pub origin: Option<String>,
    /// Treat an empty/malformed body like a transport failure and keep going.
    pub fallback_on_empty_response: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            direct_timeout: DEFAULT_DIRECT_TIMEOUT,
            relay_timeout: DEFAULT_RELAY_TIMEOUT,
            relays: RelayProxy::default_chain(),
            origin: None,
            fallback_on_empty_response: false,
        }
    }
}

enum Attempt {
    Success(String),
    TransportFailure(ChatError),
    ParseFailure(ChatError),
}

/// Sends a prompt over the first network path that answers.
///
/// Strategies run in order (direct, then each relay). Transport failures move
/// on to the next one; a body without a `response` stops the chain unless
/// `fallback_on_empty_response` is set.
pub struct Dispatcher<T = HttpTransport> {
    transport: T,
    settings: DispatchSettings,
    strategies: Vec<Strategy>,
}

impl Dispatcher<HttpTransport> {
    pub fn new(settings: DispatchSettings) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, settings))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(transport: T, settings: DispatchSettings) -> Self {
        let strategies = std::iter::once(Strategy::Direct)
            .chain(settings.relays.iter().cloned().map(Strategy::Relay))
            .collect();
        Self {
            transport,
            settings,
            strategies,
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Endpoint URL carrying `prompt` and `model` as query parameters.
    pub fn target_url(&self, prompt: &str, model: &str) -> Result<Url> {
        let mut url = Url::parse(&self.settings.endpoint).map_err(|e| {
            ChatError::ConfigError(format!(
                "Invalid API endpoint '{}': {}",
                self.settings.endpoint, e
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("prompt", prompt)
            .append_pair("model", model);
        Ok(url)
    }

    pub async fn send(&self, prompt: &str, model: &str) -> Result<String> {
        let target = self.target_url(prompt, model)?;
        let mut failures = 0usize;

        for strategy in &self.strategies {
            match self.attempt(strategy, &target).await? {
                Attempt::Success(text) => {
                    debug!(strategy = %strategy, bytes = text.len(), "response received");
                    return Ok(text);
                }
                Attempt::TransportFailure(e) => {
                    failures += 1;
                    warn!(strategy = %strategy, error = %e, "request failed, trying next path");
                }
                Attempt::ParseFailure(e) if self.settings.fallback_on_empty_response => {
                    failures += 1;
                    warn!(strategy = %strategy, error = %e, "unusable response, trying next path");
                }
                Attempt::ParseFailure(e) => {
                    warn!(strategy = %strategy, error = %e, "unusable response");
                    return Err(e);
                }
            }
        }

        error!(attempts = failures, "all request paths failed");
        Err(ChatError::ConnectionExhausted {
            diagnostic: self.diagnose(CONNECTION_FAILURE_REASON),
        })
    }

    async fn attempt(&self, strategy: &Strategy, target: &Url) -> Result<Attempt> {
        let url = strategy.request_url(target)?;
        let timeout = match strategy {
            Strategy::Direct => self.settings.direct_timeout,
            Strategy::Relay(_) => self.settings.relay_timeout,
        };
        debug!(strategy = %strategy, url = %url, timeout_ms = timeout.as_millis() as u64, "sending request");

        let response = match self.transport.get(&url, timeout).await {
            Ok(response) => response,
            Err(e) if e.is_transport_failure() => return Ok(Attempt::TransportFailure(e)),
            Err(e) => return Err(e),
        };
        if !response.is_success() {
            return Ok(Attempt::TransportFailure(ChatError::ApiError {
                status: response.status,
                message: response.body,
            }));
        }

        Ok(match extract_response(&response.body) {
            Ok(text) => Attempt::Success(text),
            Err(e) => Attempt::ParseFailure(e),
        })
    }

    /// User-facing text for a failed send.
    pub fn describe_failure(&self, err: &ChatError) -> String {
        match err {
            ChatError::ConnectionExhausted { diagnostic } => diagnostic.clone(),
            other => self.diagnose(&other.to_string()),
        }
    }

    fn diagnose(&self, reason: &str) -> String {
        let mut message = format!("**Connection Failed**: {}.", reason.trim_end_matches('.'));
        if self.mixed_content_likely() {
            message.push_str("\n\n");
            message.push_str(MIXED_CONTENT_NOTE);
        }
        message
    }

    /// A secure origin cannot reach a plain-http endpoint directly.
    pub fn mixed_content_likely(&self) -> bool {
        let secure_origin = self
            .settings
            .origin
            .as_deref()
            .map(|origin| origin.to_ascii_lowercase().starts_with("https:"))
            .unwrap_or(false);
        secure_origin && self.settings.endpoint.to_ascii_lowercase().starts_with("http:")
    }
}
