//! Document-analysis collaborator.
//!
//! Something has to turn document bytes into a block graph. The crate only
//! depends on the [`DocumentAnalyzer`] trait; [`HttpAnalyzer`] talks to any
//! endpoint that answers with analysis-response JSON.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::AnalysisResponse;
use crate::parser::ParseOptions;

/// Turns document bytes into an analysis response.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze one document for the features enabled in `options`.
    async fn analyze(&self, document: &[u8], options: &ParseOptions) -> Result<AnalysisResponse>;
}

#[cfg(feature = "remote")]
pub use remote::HttpAnalyzer;

#[cfg(feature = "remote")]
mod remote {
    use std::time::Duration;

    use async_trait::async_trait;
    use log::{debug, error};
    use reqwest::Client;

    use super::DocumentAnalyzer;
    use crate::detect::detect_format_from_bytes;
    use crate::error::{Error, Result};
    use crate::model::AnalysisResponse;
    use crate::parser::ParseOptions;

    /// Default request timeout for the analysis endpoint.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Analyzer that POSTs raw document bytes to an HTTP endpoint.
    ///
    /// The requested features go in the `features` query parameter, e.g.
    /// `?features=TABLES,FORMS`.
    #[derive(Debug, Clone)]
    pub struct HttpAnalyzer {
        client: Client,
        endpoint: String,
    }

    impl HttpAnalyzer {
        /// Create an analyzer for `endpoint` with the default timeout.
        pub fn new(endpoint: impl Into<String>) -> Result<Self> {
            Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        }

        /// Create an analyzer with a custom request timeout.
        pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
            let endpoint = endpoint.into();
            if endpoint.trim().is_empty() {
                return Err(Error::Config("analyzer endpoint is empty".into()));
            }
            let client = Client::builder().timeout(timeout).build()?;
            Ok(Self { client, endpoint })
        }

        /// The configured endpoint.
        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl DocumentAnalyzer for HttpAnalyzer {
        async fn analyze(&self, document: &[u8], options: &ParseOptions) -> Result<AnalysisResponse> {
            let format = detect_format_from_bytes(document)?;
            let features: Vec<&str> = options.feature_types().iter().map(|f| f.as_str()).collect();

            debug!(
                "sending {} byte {} document to {} (features: {})",
                document.len(),
                format,
                self.endpoint,
                features.join(",")
            );

            let response = self
                .client
                .post(&self.endpoint)
                .query(&[("features", features.join(","))])
                .header(reqwest::header::CONTENT_TYPE, format.mime_type())
                .body(document.to_vec())
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            debug!("analysis endpoint response status: {}", status);

            if !status.is_success() {
                error!("analysis endpoint error: {} - {}", status, body);
                return Err(Error::Analyzer(format!("HTTP {}: {}", status, body)));
            }

            serde_json::from_str(&body).map_err(|e| {
                error!("failed to parse analysis response: {}", e);
                Error::Analyzer(format!("invalid analysis response: {}", e))
            })
        }
    }

}
