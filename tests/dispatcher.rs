use async_trait::async_trait;
use relaychat::api::{DispatchSettings, Dispatcher, Transport, TransportResponse};
use relaychat::error::{ChatError, Result};
use reqwest::Url;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

enum Scripted {
    Reply(u16, String),
    Timeout,
    Refused,
}

fn ok(text: &str) -> Scripted {
    Scripted::Reply(200, json!({ "response": text }).to_string())
}

/// Plays back one scripted outcome per request and records what was asked.
struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(Url, Duration)>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(Url, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    fn hosts(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(url, _)| url.host_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<TransportResponse> {
        self.calls.lock().unwrap().push((url.clone(), timeout));
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(status, body)) => Ok(TransportResponse::new(status, body)),
            Some(Scripted::Timeout) => Err(ChatError::NetworkTimeout),
            Some(Scripted::Refused) | None => {
                Err(ChatError::NetworkFailure("connection refused".into()))
            }
        }
    }
}

fn settings() -> DispatchSettings {
    DispatchSettings {
        endpoint: "http://chat.example.test:9100/chat/get".into(),
        ..DispatchSettings::default()
    }
}

fn dispatcher(script: Vec<Scripted>, settings: DispatchSettings) -> Dispatcher<ScriptedTransport> {
    Dispatcher::with_transport(ScriptedTransport::new(script), settings)
}

#[tokio::test]
async fn test_direct_success_skips_relays() {
    let d = dispatcher(vec![ok("Hello there")], settings());

    let text = d.send("hi", "gpt-5").await.unwrap();

    assert_eq!(text, "Hello there");
    assert_eq!(d.transport().hosts(), vec!["chat.example.test"]);
}

#[tokio::test]
async fn test_direct_request_carries_prompt_and_model() {
    let d = dispatcher(vec![ok("ok")], settings());
    d.send("what is 2+2?", "deepseek-r1").await.unwrap();

    let (url, timeout) = d.transport().calls().remove(0);
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("prompt".to_string(), "what is 2+2?".to_string()),
            ("model".to_string(), "deepseek-r1".to_string()),
        ]
    );
    assert_eq!(timeout, Duration::from_millis(3000));
}

#[tokio::test]
async fn test_direct_timeout_falls_back_to_first_relay() {
    let d = dispatcher(vec![Scripted::Timeout, ok("via relay")], settings());

    let text = d.send("hi", "gpt-5").await.unwrap();

    assert_eq!(text, "via relay");
    assert_eq!(
        d.transport().hosts(),
        vec!["chat.example.test", "api.allorigins.win"]
    );

    let (relay_url, relay_timeout) = d.transport().calls().remove(1);
    let wrapped: Vec<(String, String)> = relay_url.query_pairs().into_owned().collect();
    assert_eq!(wrapped.len(), 1);
    assert_eq!(wrapped[0].0, "url");
    assert!(wrapped[0].1.starts_with("http://chat.example.test:9100/chat/get?prompt=hi"));
    assert_eq!(relay_timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_second_relay_used_when_first_fails() {
    let d = dispatcher(
        vec![Scripted::Refused, Scripted::Timeout, ok("third time")],
        settings(),
    );

    assert_eq!(d.send("hi", "gpt-5").await.unwrap(), "third time");
    assert_eq!(
        d.transport().hosts(),
        vec!["chat.example.test", "api.allorigins.win", "api.codetabs.com"]
    );
    let (codetabs_url, _) = d.transport().calls().remove(2);
    assert!(codetabs_url.query_pairs().any(|(k, _)| k == "quest"));
}

#[tokio::test]
async fn test_non_success_status_falls_through() {
    let d = dispatcher(
        vec![Scripted::Reply(502, "Bad Gateway".into()), ok("relay answer")],
        settings(),
    );

    assert_eq!(d.send("hi", "gpt-5").await.unwrap(), "relay answer");
    assert_eq!(d.transport().calls().len(), 2);
}

#[tokio::test]
async fn test_all_paths_failing_exhausts_connection() {
    let d = dispatcher(
        vec![Scripted::Timeout, Scripted::Refused, Scripted::Refused],
        settings(),
    );

    let err = d.send("hi", "gpt-5").await.unwrap_err();

    assert_eq!(d.transport().calls().len(), 3);
    match &err {
        ChatError::ConnectionExhausted { diagnostic } => {
            assert!(diagnostic.contains("multiple attempts"));
            assert!(diagnostic.starts_with("**Connection Failed**"));
            assert!(!diagnostic.contains("Mixed Content"));
        }
        other => panic!("expected ConnectionExhausted, got {:?}", other),
    }
    assert_eq!(d.describe_failure(&err), err.to_string());
}

#[tokio::test]
async fn test_mixed_content_note_for_secure_origin() {
    let d = dispatcher(
        vec![Scripted::Refused, Scripted::Refused, Scripted::Refused],
        DispatchSettings {
            origin: Some("https://chat.example.org".into()),
            ..settings()
        },
    );
    assert!(d.mixed_content_likely());

    let err = d.send("hi", "gpt-5").await.unwrap_err();
    assert!(err.to_string().contains("Mixed Content blocking is likely"));
}

#[tokio::test]
async fn test_no_mixed_content_note_for_secure_endpoint() {
    let d = dispatcher(
        vec![Scripted::Refused, Scripted::Refused, Scripted::Refused],
        DispatchSettings {
            endpoint: "https://chat.example.test/chat/get".into(),
            origin: Some("https://chat.example.org".into()),
            ..settings()
        },
    );
    assert!(!d.mixed_content_likely());

    let err = d.send("hi", "gpt-5").await.unwrap_err();
    assert!(err.to_string().contains("multiple attempts"));
    assert!(!err.to_string().contains("Mixed Content"));
}

#[test]
fn test_default_chain_order() {
    let d = dispatcher(vec![], settings());
    let names: Vec<String> = d.strategies().iter().map(|s| s.to_string()).collect();
    assert_eq!(names, vec!["direct", "relay:allorigins", "relay:codetabs"]);
}

#[tokio::test]
async fn test_empty_response_stops_the_chain() {
    let d = dispatcher(
        vec![Scripted::Reply(200, json!({ "status": "ok" }).to_string()), ok("unused")],
        settings(),
    );

    let err = d.send("hi", "gpt-5").await.unwrap_err();

    assert!(matches!(err, ChatError::EmptyResponse));
    assert_eq!(d.transport().calls().len(), 1);
}

#[tokio::test]
async fn test_empty_response_can_fall_through_when_enabled() {
    let d = dispatcher(
        vec![Scripted::Reply(200, "{}".into()), ok("relay answer")],
        DispatchSettings {
            fallback_on_empty_response: true,
            ..settings()
        },
    );

    assert_eq!(d.send("hi", "gpt-5").await.unwrap(), "relay answer");
    assert_eq!(d.transport().calls().len(), 2);
}

#[tokio::test]
async fn test_custom_relay_chain_is_used() {
    let d = dispatcher(
        vec![Scripted::Timeout, Scripted::Timeout],
        DispatchSettings {
            relays: vec![relaychat::api::RelayProxy::new(
                "local",
                "http://localhost:8080/proxy",
                "target",
            )],
            ..settings()
        },
    );

    let err = d.send("hi", "gpt-5").await.unwrap_err();
    assert!(matches!(err, ChatError::ConnectionExhausted { .. }));
    assert_eq!(d.transport().hosts(), vec!["chat.example.test", "localhost"]);
}

#[tokio::test]
async fn test_invalid_endpoint_is_config_error() {
    let d = dispatcher(
        vec![],
        DispatchSettings {
            endpoint: "not a url".into(),
            ..settings()
        },
    );

    let err = d.send("hi", "gpt-5").await.unwrap_err();
    assert!(matches!(err, ChatError::ConfigError(_)));
    assert!(d.transport().calls().is_empty());
}

#[test]
fn test_describe_failure_formats_single_errors() {
    let d = dispatcher(vec![], settings());
    assert_eq!(
        d.describe_failure(&ChatError::EmptyResponse),
        "**Connection Failed**: Empty response from model."
    );
}
