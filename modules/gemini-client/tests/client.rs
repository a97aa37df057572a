//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use gemini_client::{GeminiClient, GeminiError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::new("test-key", "gemini-3-flash-preview").with_base_url(base_url)
}

#[tokio::test]
async fn generate_json_returns_candidate_text() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "text": "[{\"name\":\"Spring Sale\"}]" }
                    ]
                }
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/models/gemini-3-flash-preview:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate_json("extract campaigns")
        .await
        .expect("should return candidate text");

    assert_eq!(text, "[{\"name\":\"Spring Sale\"}]");
}

#[tokio::test]
async fn generate_json_sends_json_mode_and_low_temperature() {
    let server = MockServer::start().await;

    let expected = serde_json::json!({
        "generationConfig": {
            "responseMimeType": "application/json",
            "temperature": 0.1
        }
    });

    let body = serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": "[]" } ] } }
        ]
    });

    Mock::given(method("POST"))
        .and(body_partial_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.generate_json("prompt").await.expect("should succeed");
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generate_json("prompt").await.unwrap_err();

    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("quota"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generate_json("prompt").await.unwrap_err();

    assert!(matches!(err, GeminiError::EmptyResponse));
}
