//! Narrative synthesis over extracted reports.
//!
//! A [`Synthesizer`] turns report Markdown plus the patient form into two
//! narratives (a clinical summary and a biomarker risk analysis) and answers
//! follow-up questions. Text generation goes through [`CompletionService`].

mod prompt;

#[cfg(feature = "remote")]
mod gemini;

pub use prompt::{biomarker_risk_prompt, chat_prompt, summary_prompt};

#[cfg(feature = "remote")]
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Message returned when an analysis request lacks its inputs.
pub const MISSING_ANALYSIS_INPUT: &str = "Missing report_content or patient_details";

/// Message returned when a chat request lacks its inputs.
pub const MISSING_CHAT_INPUT: &str = "Missing summary or question";

/// Generates text from a prompt.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete one prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Patient form submitted alongside a report.
///
/// Numbers are accepted where strings are expected, and `symptoms` may be a
/// list, which is joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    /// Age in years
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: String,
    /// Gender as entered
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    /// Weight in kilograms
    #[serde(default, deserialize_with = "lenient_string")]
    pub weight: String,
    /// Recent symptoms
    #[serde(default, deserialize_with = "lenient_string")]
    pub symptoms: String,
}

impl PatientDetails {
    /// Create patient details from the four form fields.
    pub fn new(
        age: impl Into<String>,
        gender: impl Into<String>,
        weight: impl Into<String>,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            age: age.into(),
            gender: gender.into(),
            weight: weight.into(),
            symptoms: symptoms.into(),
        }
    }

    /// True when no field carries any text.
    pub fn is_blank(&self) -> bool {
        [&self.age, &self.gender, &self.weight, &self.symptoms]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    fn flatten(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            Value::Array(items) => items
                .into_iter()
                .map(flatten)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }

    Ok(flatten(Value::deserialize(deserializer)?))
}

/// Body of an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Report Markdown produced by the extractor
    #[serde(default)]
    pub report_content: String,

    /// Patient form
    #[serde(default)]
    pub patient_details: Option<PatientDetails>,
}

impl AnalysisRequest {
    /// Create a request with both inputs.
    pub fn new(report_content: impl Into<String>, patient_details: PatientDetails) -> Self {
        Self {
            report_content: report_content.into(),
            patient_details: Some(patient_details),
        }
    }

    /// Check that both inputs are present and non-empty.
    pub fn validate(&self) -> Result<(&str, &PatientDetails)> {
        match &self.patient_details {
            Some(details) if !self.report_content.trim().is_empty() && !details.is_blank() => {
                Ok((&self.report_content, details))
            }
            _ => Err(Error::InvalidRequest(MISSING_ANALYSIS_INPUT.into())),
        }
    }
}

/// The two narratives produced for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Plain-language summary of the report
    pub patient_summary: String,

    /// Biomarker risk analysis. The wire name is what web clients read.
    #[serde(rename = "patient_biomakers_trends")]
    pub biomarker_trends: String,
}

/// A follow-up question about a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Summary the question refers to
    #[serde(default)]
    pub summary: String,
    /// The patient's question
    #[serde(default)]
    pub question: String,
}

impl ChatRequest {
    /// Create a chat request.
    pub fn new(summary: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            question: question.into(),
        }
    }

    /// Check that both inputs are non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.summary.trim().is_empty() || self.question.trim().is_empty() {
            return Err(Error::InvalidRequest(MISSING_CHAT_INPUT.into()));
        }
        Ok(())
    }
}

/// Answer to a [`ChatRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Completion text
    pub answer: String,
}

/// Runs the synthesis prompts against a completion service.
pub struct Synthesizer<C> {
    completion: C,
}

impl<C: CompletionService> Synthesizer<C> {
    /// Wrap a completion service.
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    /// The underlying completion service.
    pub fn completion(&self) -> &C {
        &self.completion
    }

    /// Produce the summary and the biomarker analysis, in that order.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let (report, patient) = request.validate()?;
        debug!("synthesizing report of {} bytes", report.len());

        let patient_summary = self.completion.complete(&summary_prompt(report, patient)).await?;
        let biomarker_trends = self
            .completion
            .complete(&biomarker_risk_prompt(report, patient))
            .await?;

        info!(
            "synthesis complete: summary {} bytes, biomarkers {} bytes",
            patient_summary.len(),
            biomarker_trends.len()
        );
        Ok(AnalysisReport {
            patient_summary,
            biomarker_trends,
        })
    }

    /// Answer a follow-up question.
    pub async fn answer(&self, request: &ChatRequest) -> Result<ChatReply> {
        request.validate()?;
        let answer = self
            .completion
            .complete(&chat_prompt(&request.summary, &request.question))
            .await?;
        Ok(ChatReply { answer })
    }
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionService for Recording {
        async fn complete(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            Ok(format!("reply {}", prompts.len()))
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionService for Failing {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::Completion("quota exceeded".into()))
        }
    }

    fn patient() -> PatientDetails {
        PatientDetails::new("54", "female", "71", "fatigue")
    }

    #[test]
    fn test_patient_details_lenient_fields() {
        let details: PatientDetails = serde_json::from_str(
            r#"{"age": 54, "gender": "male", "weight": 80.5, "symptoms": ["cough", "fever"]}"#,
        )
        .unwrap();

        assert_eq!(details, PatientDetails::new("54", "male", "80.5", "cough, fever"));
    }

    #[test]
    fn test_analysis_request_validate() {
        assert!(AnalysisRequest::new("# Report", patient()).validate().is_ok());

        let missing: AnalysisRequest = serde_json::from_str(r#"{"report_content": "x"}"#).unwrap();
        let err = missing.validate().unwrap_err();
        assert_eq!(err.to_string(), MISSING_ANALYSIS_INPUT);
        assert!(err.is_client_error());

        let empty_details: AnalysisRequest =
            serde_json::from_str(r#"{"report_content": "x", "patient_details": {}}"#).unwrap();
        assert!(empty_details.validate().is_err());

        assert!(AnalysisRequest::new("  ", patient()).validate().is_err());
    }

    #[test]
    fn test_report_wire_names() {
        let report = AnalysisReport {
            patient_summary: "s".into(),
            biomarker_trends: "b".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["patient_summary"], "s");
        assert_eq!(json["patient_biomakers_trends"], "b");
    }

    #[tokio::test]
    async fn test_analyze_runs_both_prompts_in_order() {
        let synthesizer = Synthesizer::new(Recording::default());
        let report = synthesizer
            .analyze(&AnalysisRequest::new("| LDL | 190 |", patient()))
            .await
            .unwrap();

        assert_eq!(report.patient_summary, "reply 1");
        assert_eq!(report.biomarker_trends, "reply 2");

        let prompts = synthesizer.completion().prompts.lock().unwrap();
        assert!(prompts[0].contains("Medical Data Analyst"));
        assert!(prompts[1].contains("Biomarker Risk Analysis"));
        assert!(prompts.iter().all(|p| p.contains("| LDL | 190 |")));
    }

    #[tokio::test]
    async fn test_analyze_rejects_before_calling_service() {
        let synthesizer = Synthesizer::new(Recording::default());
        let request = AnalysisRequest {
            report_content: "report".into(),
            patient_details: None,
        };

        assert!(synthesizer.analyze(&request).await.is_err());
        assert!(synthesizer.completion().prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let synthesizer = Synthesizer::new(Failing);
        let err = synthesizer
            .analyze(&AnalysisRequest::new("report", patient()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Completion(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_answer() {
        let synthesizer = Synthesizer::new(Recording::default());
        let reply = synthesizer
            .answer(&ChatRequest::new("High LDL.", "What should I eat?"))
            .await
            .unwrap();
        assert_eq!(reply.answer, "reply 1");

        let err = synthesizer
            .answer(&ChatRequest::new("High LDL.", " "))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_CHAT_INPUT);
    }
}
