//! HTTP request handling for the extraction and synthesis endpoints.
//!
//! Handlers take a transport-neutral [`HttpRequest`] and always produce an
//! [`HttpResponse`]; failures become JSON `{"error": ...}` bodies. Input
//! problems map to 400 and collaborator failures to 500. Every response
//! carries permissive CORS headers.
//!
//! [`GatewayEvent`] and the serialized [`HttpResponse`] follow the API
//! Gateway HTTP payload shape, so the handlers can sit directly behind a
//! function-as-a-service entry point as well as behind the bundled server.

use std::collections::BTreeMap;

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analyzer::DocumentAnalyzer;
use crate::convert::{convert_response, ConvertOptions, OutputFormat};
use crate::detect::{decode_base64_body, detect_format_from_bytes};
use crate::error::{Error, Result};
use crate::synthesis::{AnalysisRequest, ChatRequest, CompletionService, Synthesizer};

/// `Access-Control-Allow-Origin` on every response.
pub const ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Methods` on preflight responses.
pub const PREFLIGHT_ALLOW_METHODS: &str = "OPTIONS,GET,POST";
/// `Access-Control-Allow-Headers` on preflight responses.
pub const PREFLIGHT_ALLOW_HEADERS: &str = "Content-Type,Authorization";
/// `Access-Control-Allow-Methods` on all other responses.
pub const ALLOW_METHODS: &str = "POST,OPTIONS";
/// `Access-Control-Allow-Headers` on all other responses.
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Error message for an extraction request whose body is not binary.
pub const NOT_BASE64_ENCODED: &str = "File content is not Base64 encoded.";

/// Request body as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Body delivered as text
    Text(String),
    /// Body delivered as (decoded) binary
    Binary(Vec<u8>),
}

impl RequestBody {
    fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Empty => &[],
            RequestBody::Text(text) => text.as_bytes(),
            RequestBody::Binary(data) => data,
        }
    }
}

/// Transport-neutral HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method, e.g. `POST`
    pub method: String,
    /// Request body
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a request from a method and body.
    pub fn new(method: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    /// An `OPTIONS` preflight request.
    pub fn options() -> Self {
        Self::new("OPTIONS", RequestBody::Empty)
    }

    /// A `POST` with a text body.
    pub fn post_text(body: impl Into<String>) -> Self {
        Self::new("POST", RequestBody::Text(body.into()))
    }

    /// A `POST` with a binary body.
    pub fn post_binary(body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", RequestBody::Binary(body.into()))
    }

    /// Whether this is a CORS preflight.
    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case("OPTIONS")
    }

    /// Decode the body as JSON. An empty body decodes as `{}`.
    fn json<T: for<'de> Deserialize<'de> + Default>(&self) -> Result<T> {
        match &self.body {
            RequestBody::Empty => Ok(T::default()),
            body => Ok(serde_json::from_slice(body.as_bytes())?),
        }
    }
}

/// API Gateway HTTP event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    /// Request metadata, including the method
    #[serde(default)]
    pub request_context: RequestContext,
    /// Raw body, base64 when `is_base64_encoded` is set
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// `requestContext` of a [`GatewayEvent`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    /// HTTP details
    #[serde(default)]
    pub http: HttpContext,
}

/// `requestContext.http` of a [`GatewayEvent`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpContext {
    /// HTTP method
    #[serde(default)]
    pub method: String,
}

impl GatewayEvent {
    /// Whether this is a CORS preflight. Checked before the body is decoded.
    pub fn is_preflight(&self) -> bool {
        self.request_context.http.method.eq_ignore_ascii_case("OPTIONS")
    }

    /// Convert to an [`HttpRequest`], decoding base64 bodies.
    pub fn into_request(self) -> Result<HttpRequest> {
        let body = match self.body {
            None => RequestBody::Empty,
            Some(body) if self.is_base64_encoded => RequestBody::Binary(decode_base64_body(&body)?),
            Some(body) if body.is_empty() => RequestBody::Empty,
            Some(body) => RequestBody::Text(body),
        };
        Ok(HttpRequest::new(self.request_context.http.method, body))
    }
}

/// HTTP response in the API Gateway result shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response headers, CORS included
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Response to a CORS preflight.
    pub fn preflight() -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", ALLOW_ORIGIN),
            ("Access-Control-Allow-Methods", PREFLIGHT_ALLOW_METHODS),
            ("Access-Control-Allow-Headers", PREFLIGHT_ALLOW_HEADERS),
        ];
        Self {
            status_code: 200,
            headers: to_headers(&headers),
            body: String::new(),
        }
    }

    /// Response with the standard CORS headers and no content type.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", ALLOW_ORIGIN),
            ("Access-Control-Allow-Headers", ALLOW_HEADERS),
            ("Access-Control-Allow-Methods", ALLOW_METHODS),
        ];
        Self {
            status_code,
            headers: to_headers(&headers),
            body: body.into(),
        }
    }

    /// 200 response with a plain-text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(200, body).with_header("Content-Type", "text/plain")
    }

    /// Response with a JSON body.
    pub fn json<T: Serialize>(status_code: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::new(status_code, body).with_header("Content-Type", "application/json"),
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    /// `{"error": message}` response.
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::new(status_code, json!({ "error": message }).to_string())
            .with_header("Content-Type", "application/json")
    }

    /// Map an error to a 400 or 500 response.
    pub fn from_error(err: &Error) -> Self {
        let status = if err.is_client_error() { 400 } else { 500 };
        Self::error(status, &err.to_string())
    }

    /// Set a header and return self.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Look up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

fn to_headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn respond(endpoint: &str, result: Result<HttpResponse>) -> HttpResponse {
    match result {
        Ok(response) => {
            info!("{}: {}", endpoint, response.status_code);
            response
        }
        Err(err) => {
            let response = HttpResponse::from_error(&err);
            error!("{}: {} {}", endpoint, response.status_code, err);
            response
        }
    }
}

/// Extract a binary document into Markdown.
pub async fn handle_extract<A>(analyzer: &A, request: &HttpRequest) -> HttpResponse
where
    A: DocumentAnalyzer + ?Sized,
{
    handle_extract_with_options(analyzer, request, &ConvertOptions::default()).await
}

/// Extract a binary document with custom parse and render options.
pub async fn handle_extract_with_options<A>(
    analyzer: &A,
    request: &HttpRequest,
    options: &ConvertOptions,
) -> HttpResponse
where
    A: DocumentAnalyzer + ?Sized,
{
    if request.is_preflight() {
        return HttpResponse::preflight();
    }
    respond("extract", extract(analyzer, request, options).await)
}

async fn extract<A>(analyzer: &A, request: &HttpRequest, options: &ConvertOptions) -> Result<HttpResponse>
where
    A: DocumentAnalyzer + ?Sized,
{
    let RequestBody::Binary(document) = &request.body else {
        return Err(Error::InvalidRequest(NOT_BASE64_ENCODED.into()));
    };
    detect_format_from_bytes(document)?;

    let response = analyzer.analyze(document, &options.parse).await?;
    let options = options.clone().with_format(OutputFormat::Markdown);
    let converted = convert_response(&response, &options)?;
    Ok(HttpResponse::text(converted.content))
}

/// Synthesize the summary and biomarker narratives for a report.
pub async fn handle_analysis<C>(synthesizer: &Synthesizer<C>, request: &HttpRequest) -> HttpResponse
where
    C: CompletionService,
{
    if request.is_preflight() {
        return HttpResponse::preflight();
    }
    let result = async {
        let body: AnalysisRequest = request.json()?;
        let report = synthesizer.analyze(&body).await?;
        Ok::<_, Error>(HttpResponse::json(200, &report))
    };
    respond("analysis", result.await)
}

/// Answer a follow-up question about a summary.
pub async fn handle_chat<C>(synthesizer: &Synthesizer<C>, request: &HttpRequest) -> HttpResponse
where
    C: CompletionService,
{
    if request.is_preflight() {
        return HttpResponse::preflight();
    }
    let result = async {
        let body: ChatRequest = request.json()?;
        let reply = synthesizer.answer(&body).await?;
        Ok::<_, Error>(HttpResponse::json(200, &reply))
    };
    respond("chat", result.await)
}

/// [`handle_extract`] for a raw gateway event.
pub async fn handle_extract_event<A>(analyzer: &A, event: GatewayEvent) -> HttpResponse
where
    A: DocumentAnalyzer + ?Sized,
{
    if event.is_preflight() {
        return HttpResponse::preflight();
    }
    match event.into_request() {
        Ok(request) => handle_extract(analyzer, &request).await,
        Err(err) => respond("extract", Err(err)),
    }
}

/// [`handle_analysis`] for a raw gateway event.
pub async fn handle_analysis_event<C>(synthesizer: &Synthesizer<C>, event: GatewayEvent) -> HttpResponse
where
    C: CompletionService,
{
    if event.is_preflight() {
        return HttpResponse::preflight();
    }
    match event.into_request() {
        Ok(request) => handle_analysis(synthesizer, &request).await,
        Err(err) => respond("analysis", Err(err)),
    }
}
