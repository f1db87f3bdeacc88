use relaychat::api::extract_response;
use relaychat::error::ChatError;
use serde_json::json;

#[test]
fn test_extract_response_with_text() {
    let body = json!({ "response": "Hello, world!" }).to_string();

    let text = extract_response(&body).unwrap();
    assert_eq!(text, "Hello, world!");
}

#[test]
fn test_extract_response_ignores_extra_fields() {
    let body = json!({
        "response": "<think>hmm</think>Hi",
        "model": "gpt-5",
        "elapsed": 1.2
    })
    .to_string();

    assert_eq!(extract_response(&body).unwrap(), "<think>hmm</think>Hi");
}

#[test]
fn test_extract_response_without_field() {
    let body = json!({ "status": "ok" }).to_string();

    let result = extract_response(&body);
    assert!(matches!(result, Err(ChatError::EmptyResponse)));
}

#[test]
fn test_extract_response_empty_string() {
    let body = json!({ "response": "" }).to_string();

    assert!(matches!(extract_response(&body), Err(ChatError::EmptyResponse)));
}

#[test]
fn test_extract_response_null_or_wrong_type() {
    let null_body = json!({ "response": null }).to_string();
    let number_body = json!({ "response": 42 }).to_string();

    assert!(matches!(extract_response(&null_body), Err(ChatError::EmptyResponse)));
    assert!(matches!(extract_response(&number_body), Err(ChatError::EmptyResponse)));
}

#[test]
fn test_extract_response_not_json() {
    let result = extract_response("<html>502 Bad Gateway</html>");
    assert!(matches!(result, Err(ChatError::EmptyResponse)));
}

#[test]
fn test_empty_response_is_not_a_transport_failure() {
    assert!(!ChatError::EmptyResponse.is_transport_failure());
    assert_eq!(ChatError::EmptyResponse.to_string(), "Empty response from model");
}
