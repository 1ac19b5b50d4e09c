//! HTTP server exposing the request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use log::info;

use medreport::handler::{self, HttpRequest, HttpResponse, RequestBody};
use medreport::synthesis::{GeminiClient, GeminiConfig};
use medreport::{DocumentAnalyzer, HttpAnalyzer, Synthesizer};

/// Shared collaborators. Either may be absent, in which case its endpoints
/// answer 503.
#[derive(Clone)]
pub struct AppState {
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    synthesizer: Option<Arc<Synthesizer<GeminiClient>>>,
}

impl AppState {
    /// State from already-built collaborators.
    pub fn new(
        analyzer: Option<Arc<dyn DocumentAnalyzer>>,
        synthesizer: Option<Arc<Synthesizer<GeminiClient>>>,
    ) -> Self {
        Self {
            analyzer,
            synthesizer,
        }
    }

    /// Build collaborators from CLI settings. Missing settings leave them unset.
    pub fn from_settings(
        analyzer_url: Option<String>,
        api_key: Option<String>,
        model: String,
    ) -> medreport::Result<Self> {
        let analyzer = match analyzer_url {
            Some(url) => {
                info!("document analyzer: {}", url);
                Some(Arc::new(HttpAnalyzer::new(url)?) as Arc<dyn DocumentAnalyzer>)
            }
            None => None,
        };
        let synthesizer = match api_key {
            Some(key) => {
                info!("completion model: {}", model);
                let client = GeminiClient::new(GeminiConfig::new(key).with_model(model))?;
                Some(Arc::new(Synthesizer::new(client)))
            }
            None => None,
        };
        Ok(Self::new(analyzer, synthesizer))
    }
}

/// Routes for the three endpoints, each accepting `POST` and `OPTIONS`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(extract).options(extract))
        .route("/analysis", post(analysis).options(analysis))
        .route("/chat", post(chat).options(chat))
        .with_state(state)
}

async fn extract(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_request(&method, &headers, body);
    let response = match &state.analyzer {
        Some(analyzer) => handler::handle_extract(&**analyzer, &request).await,
        None if request.is_preflight() => HttpResponse::preflight(),
        None => HttpResponse::error(503, "document analyzer is not configured"),
    };
    to_response(response)
}

async fn analysis(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_request(&method, &headers, body);
    let response = match &state.synthesizer {
        Some(synthesizer) => handler::handle_analysis(&**synthesizer, &request).await,
        None if request.is_preflight() => HttpResponse::preflight(),
        None => HttpResponse::error(503, "completion service is not configured"),
    };
    to_response(response)
}

async fn chat(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_request(&method, &headers, body);
    let response = match &state.synthesizer {
        Some(synthesizer) => handler::handle_chat(&**synthesizer, &request).await,
        None if request.is_preflight() => HttpResponse::preflight(),
        None => HttpResponse::error(503, "completion service is not configured"),
    };
    to_response(response)
}

/// Text and JSON bodies stay text; everything else is a binary upload.
fn to_request(method: &Method, headers: &HeaderMap, body: Bytes) -> HttpRequest {
    let body = if body.is_empty() {
        RequestBody::Empty
    } else if is_textual(headers) {
        match String::from_utf8(body.to_vec()) {
            Ok(text) => RequestBody::Text(text),
            Err(e) => RequestBody::Binary(e.into_bytes()),
        }
    } else {
        RequestBody::Binary(body.to_vec())
    };
    HttpRequest::new(method.as_str(), body)
}

fn is_textual(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("text/") || ct.starts_with("application/json"))
        .unwrap_or(false)
}

fn to_response(response: HttpResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    (status, headers, response.body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request_classifies_body() {
        let mut headers = HeaderMap::new();
        let request = to_request(&Method::POST, &headers, Bytes::from_static(b"%PDF-1.4"));
        assert_eq!(request.body, RequestBody::Binary(b"%PDF-1.4".to_vec()));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let request = to_request(&Method::POST, &headers, Bytes::from_static(b"{}"));
        assert_eq!(request.body, RequestBody::Text("{}".into()));

        let request = to_request(&Method::OPTIONS, &headers, Bytes::new());
        assert_eq!(request.body, RequestBody::Empty);
        assert!(request.is_preflight());
    }

    #[test]
    fn test_to_response_copies_headers() {
        let response = to_response(HttpResponse::text("# Document Analysis\n"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(response.headers().get("content-type").unwrap(), "text/plain");
    }

    #[test]
    fn test_state_without_collaborators() {
        let state = AppState::from_settings(None, None, "model".into()).unwrap();
        assert!(state.analyzer.is_none());
        assert!(state.synthesizer.is_none());
    }
}
