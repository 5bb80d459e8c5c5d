use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;

use crate::ai::{RemediationError, RemediationRequest, RemediationSuggestion};
use crate::state::AppState;

impl ResponseError for RemediationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RemediationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RemediationError::SuggestionFailed => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

/// Suggest a fix for an attendance issue
#[utoipa::path(
    post,
    path = "/api/remediation",
    request_body = RemediationRequest,
    responses(
        (status = 200, description = "Suggested remediation", body = RemediationSuggestion),
        (status = 400, description = "Empty issue description"),
        (status = 502, description = "Text generation failed", body = Object, example = json!({
            "message": "Failed to generate a suggestion"
        }))
    ),
    tag = "Remediation"
)]
pub async fn suggest_remediation(
    state: web::Data<AppState>,
    payload: web::Json<RemediationRequest>,
) -> Result<HttpResponse, RemediationError> {
    let suggestion = state.remediation.suggest(&payload).await?;
    Ok(HttpResponse::Ok().json(suggestion))
}
