//! GeminiExtractor against a mock generateContent endpoint.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemini_client::GeminiClient;
use offerwatch_common::OfferWatchError;
use offerwatch_tracker::extractor::{CampaignExtractor, GeminiExtractor};

const MODEL: &str = "gemini-3-flash-preview";

fn extractor_against(server: &MockServer) -> GeminiExtractor {
    GeminiExtractor::with_client(GeminiClient::new("test-key", MODEL).with_base_url(&server.uri()))
}

fn candidate_text(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

#[tokio::test]
async fn extracts_campaigns_from_model_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(
            r#"[{"name":"Spring Sale","info":"20% off","category":"seasonal","isBanner":true}]"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor_against(&server);
    let campaigns = extractor.extract("any prompt").await.unwrap();

    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].name, "Spring Sale");
    assert_eq!(campaigns[0].category, "seasonal");
    assert!(campaigns[0].is_banner);
}

#[tokio::test]
async fn non_json_model_output_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_text("Sorry, I cannot extract campaigns.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor_against(&server);
    let err = extractor.extract("any prompt").await.unwrap_err();

    assert!(matches!(err, OfferWatchError::ExtractionMalformed(_)));
}

#[tokio::test]
async fn upstream_api_error_is_malformed_extraction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor_against(&server);
    let err = extractor.extract("any prompt").await.unwrap_err();

    assert!(matches!(err, OfferWatchError::ExtractionMalformed(_)));
}
