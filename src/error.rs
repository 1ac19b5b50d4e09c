//! Error types for medreport.

use std::io;
use thiserror::Error;

/// Result type alias for medreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or synthesizing reports.
///
/// Block-graph traversal itself never fails: missing edge targets and
/// malformed cells are skipped. These variants cover the boundaries around it.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis response or request body is not valid JSON for its schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request payload could not be decoded.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The document bytes are not a format the analysis service accepts.
    #[error("Unknown document format: expected PDF, PNG, JPEG or TIFF")]
    UnknownFormat,

    /// A request is missing required fields.
    #[error("{0}")]
    InvalidRequest(String),

    /// The document-analysis collaborator failed.
    #[error("Document analysis error: {0}")]
    Analyzer(String),

    /// The text-completion collaborator failed.
    #[error("Completion error: {0}")]
    Completion(String),

    /// Transport error talking to a remote service. The request URL is
    /// stripped so credentials in it never reach callers or logs.
    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.without_url())
    }
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by a
    /// collaborator or the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Json(_) | Error::InvalidPayload(_) | Error::UnknownFormat | Error::InvalidRequest(_)
        )
    }
}
