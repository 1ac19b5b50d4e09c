//! Gemini client tests against a mock HTTP server.

#![cfg(feature = "remote")]

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medreport::error::Error;
use medreport::handler::{handle_analysis, handle_chat, HttpRequest};
use medreport::synthesis::{
    AnalysisRequest, CompletionService, GeminiClient, GeminiConfig, PatientDetails, Synthesizer,
};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash-latest:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_base_url(format!("{}/v1beta/models", server.uri()))
        .with_timeout(5);
    GeminiClient::new(config).unwrap()
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "totalTokenCount": 20}
    })
}

#[tokio::test]
async fn test_complete_returns_first_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "Hello"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete("Hello").await.unwrap();
    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn test_unexpected_shape_returns_raw_body() {
    let server = MockServer::start().await;
    let blocked = json!({"promptFeedback": {"blockReason": "SAFETY"}});
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(blocked.clone()))
        .mount(&server)
        .await;

    let text = client(&server).complete("prompt").await.unwrap();
    let echoed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(echoed, blocked);
}

#[tokio::test]
async fn test_error_status_is_completion_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = client(&server).complete("prompt").await.unwrap_err();
    match err {
        Error::Completion(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("expected completion error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).complete("prompt").await,
        Err(Error::Completion(_))
    ));
}

#[tokio::test]
async fn test_synthesizer_with_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("narrative")))
        .expect(2)
        .mount(&server)
        .await;

    let synthesizer = Synthesizer::new(client(&server));
    let request = AnalysisRequest::new(
        "# Document Analysis\n",
        PatientDetails::new("61", "male", "88", "chest pain"),
    );

    let report = synthesizer.analyze(&request).await.unwrap();
    assert_eq!(report.patient_summary, "narrative");
    assert_eq!(report.biomarker_trends, "narrative");
}

#[tokio::test]
async fn test_key_stays_out_of_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).complete("prompt").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.as_str().contains("test-key"));
}

#[tokio::test]
async fn test_transport_failure_does_not_expose_key() {
    let config = GeminiConfig::new("SUPERSECRET123")
        .with_base_url("http://127.0.0.1:1/v1beta/models")
        .with_timeout(5);
    let synthesizer = Synthesizer::new(GeminiClient::new(config).unwrap());

    let request = HttpRequest::post_text(
        r#"{"report_content": "report", "patient_details": {"age": "54"}}"#,
    );
    let response = handle_analysis(&synthesizer, &request).await;
    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("HTTP error"));
    assert!(!response.body.contains("SUPERSECRET123"));

    let request = HttpRequest::post_text(r#"{"summary": "s", "question": "q"}"#);
    let response = handle_chat(&synthesizer, &request).await;
    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains("SUPERSECRET123"));
}
