use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::provider::TextGenerator;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemediationRequest {
    #[schema(example = "Several students check in from the car park and get rejected as too far")]
    pub issue_description: String,
    #[serde(default)]
    #[schema(example = "Moved the session to a ground-floor room last week")]
    pub historical_actions: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemediationSuggestion {
    #[schema(example = "Open check-in only once everyone is seated and share the link in class.")]
    pub suggested_solution: String,
    /// In [0, 1].
    #[schema(example = 0.8)]
    pub confidence_level: f64,
}

#[derive(Debug, Display)]
pub enum RemediationError {
    #[display(fmt = "{}", _0)]
    InvalidRequest(String),
    #[display(fmt = "Failed to generate a suggestion")]
    SuggestionFailed,
}

impl std::error::Error for RemediationError {}

const SYSTEM_PROMPT: &str = "You are an assistant helping teachers resolve classroom attendance problems. \
Answer with a single JSON object of the form \
{\"suggestedSolution\": string, \"confidenceLevel\": number between 0 and 1}.";

fn render_prompt(request: &RemediationRequest) -> String {
    let history = match request.historical_actions.trim() {
        "" => "None recorded.",
        h => h,
    };
    format!(
        "Attendance issue:\n{}\n\nActions already taken:\n{}\n\n\
         Suggest a concrete next step for the teacher and rate your confidence.",
        request.issue_description.trim(),
        history
    )
}

/// Pulls the JSON object out of model output that may be wrapped in prose or code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

fn parse_suggestion(raw: &str) -> Result<RemediationSuggestion, String> {
    let object = extract_json_object(raw).ok_or("no JSON object in model output")?;
    let suggestion: RemediationSuggestion =
        serde_json::from_str(object).map_err(|e| format!("schema mismatch: {e}"))?;

    if suggestion.suggested_solution.trim().is_empty() {
        return Err("empty suggestedSolution".to_string());
    }
    if !(0.0..=1.0).contains(&suggestion.confidence_level) {
        return Err(format!(
            "confidenceLevel {} outside [0, 1]",
            suggestion.confidence_level
        ));
    }
    Ok(suggestion)
}

#[derive(Clone)]
pub struct RemediationService {
    generator: Arc<dyn TextGenerator>,
}

impl RemediationService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn suggest(
        &self,
        request: &RemediationRequest,
    ) -> Result<RemediationSuggestion, RemediationError> {
        if request.issue_description.trim().is_empty() {
            return Err(RemediationError::InvalidRequest(
                "issueDescription must not be empty".to_string(),
            ));
        }

        let raw = self
            .generator
            .generate(render_prompt(request), Some(SYSTEM_PROMPT.to_string()))
            .await
            .map_err(|e| {
                error!(error = %e, "Remediation generation failed");
                RemediationError::SuggestionFailed
            })?;
        debug!(chars = raw.len(), "Remediation output received");

        parse_suggestion(&raw).map_err(|reason| {
            error!(reason = %reason, "Remediation output rejected");
            RemediationError::SuggestionFailed
        })
    }
}
