use crate::error::{ChatError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A public relay that fetches `<base_url>?<param>=<target>` on our behalf.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelayProxy {
    pub name: String,
    pub base_url: String,
    pub param: String,
}

impl RelayProxy {
    pub fn new(name: &str, base_url: &str, param: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            param: param.to_string(),
        }
    }

    pub fn allorigins() -> Self {
        Self::new("allorigins", "https://api.allorigins.win/raw", "url")
    }

    pub fn codetabs() -> Self {
        Self::new("codetabs", "https://api.codetabs.com/v1/proxy", "quest")
    }

    pub fn default_chain() -> Vec<Self> {
        vec![Self::allorigins(), Self::codetabs()]
    }

    pub fn wrap(&self, target: &Url) -> Result<Url> {
        Url::parse_with_params(&self.base_url, &[(self.param.as_str(), target.as_str())]).map_err(
            |e| {
                ChatError::ConfigError(format!(
                    "Invalid relay URL for '{}' ({}): {}",
                    self.name, self.base_url, e
                ))
            },
        )
    }
}

/// One network path to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Relay(RelayProxy),
}

impl Strategy {
    pub fn name(&self) -> &str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Relay(relay) => &relay.name,
        }
    }

    pub fn request_url(&self, target: &Url) -> Result<Url> {
        match self {
            Strategy::Direct => Ok(target.clone()),
            Strategy::Relay(relay) => relay.wrap(target),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => f.write_str(self.name()),
            Strategy::Relay(_) => write!(f, "relay:{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_wraps_encoded_target() {
        let target = Url::parse("http://example.com:9100/chat/get?prompt=a+b&model=gpt-5").unwrap();
        let wrapped = RelayProxy::allorigins().wrap(&target).unwrap();
        assert_eq!(
            wrapped.as_str(),
            "https://api.allorigins.win/raw?url=http%3A%2F%2Fexample.com%3A9100%2Fchat%2Fget%3Fprompt%3Da%2Bb%26model%3Dgpt-5"
        );
    }

    #[test]
    fn test_relay_roundtrips_target_through_query() {
        let target = Url::parse("http://example.com/chat/get?prompt=hi&model=grok-4").unwrap();
        let wrapped = RelayProxy::codetabs().wrap(&target).unwrap();
        let (key, value) = wrapped.query_pairs().next().unwrap();
        assert_eq!(key, "quest");
        assert_eq!(value, target.as_str());
    }

    #[test]
    fn test_direct_uses_target_unchanged() {
        let target = Url::parse("http://example.com/chat/get?prompt=hi").unwrap();
        assert_eq!(Strategy::Direct.request_url(&target).unwrap(), target);
    }

    #[test]
    fn test_invalid_relay_base_is_config_error() {
        let target = Url::parse("http://example.com/").unwrap();
        let relay = RelayProxy::new("broken", "not a url", "u");
        assert!(matches!(relay.wrap(&target), Err(ChatError::ConfigError(_))));
    }
}
