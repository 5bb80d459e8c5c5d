use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::storage_failure;
use crate::attendance::{CheckInError, LocationSource};
use crate::model::{
    attendance::AttendanceStatus,
    course::Course,
    geo::GeoPoint,
    session::{Session, clock_time},
};
use crate::state::AppState;

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInForm {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Device position, absent when the device could not provide one
    pub location: Option<GeoPoint>,
    /// Why the device could not provide a position
    #[schema(example = json!(null))]
    pub location_error: Option<String>,
}

#[async_trait]
impl LocationSource for CheckInForm {
    async fn current_location(&self) -> Result<GeoPoint, String> {
        match (self.location, &self.location_error) {
            (Some(point), _) if point.is_valid() => Ok(point),
            (Some(_), _) => Err("Reported coordinates are out of range".to_string()),
            (None, Some(reason)) if !reason.trim().is_empty() => Err(reason.trim().to_string()),
            (None, _) => Err("Location was not provided".to_string()),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    #[schema(example = "Welcome, Ada Lovelace! You are marked Present.")]
    pub message: String,
    pub student_name: String,
    pub status: AttendanceStatus,
    #[schema(example = "9:04:12 AM")]
    pub time: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPage {
    pub course_id: String,
    pub course_name: String,
    pub session_id: String,
    #[schema(example = "2025-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(with = "clock_time", skip_serializing_if = "Option::is_none")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    /// Whether the teacher has opened check-in
    pub open: bool,
}

impl CheckInError {
    fn kind(&self) -> &'static str {
        match self {
            CheckInError::SessionNotActive => "SessionNotActive",
            CheckInError::LocationUnavailable(_) => "LocationUnavailable",
            CheckInError::TooFar(_) => "TooFar",
            CheckInError::NotFound => "NotFound",
            CheckInError::PersistenceFailure(_) => "PersistenceFailure",
        }
    }
}

impl ResponseError for CheckInError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckInError::SessionNotActive => StatusCode::CONFLICT,
            CheckInError::LocationUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CheckInError::TooFar(_) => StatusCode::FORBIDDEN,
            CheckInError::NotFound => StatusCode::NOT_FOUND,
            CheckInError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let CheckInError::TooFar(distance) = self {
            body["distanceMeters"] = json!(distance);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "SessionNotFound",
        "message": "This check-in link is not valid"
    }))
}

/// Session and course behind a check-in link, if the pair is consistent.
async fn resolve(
    state: &AppState,
    course_id: &str,
    session_id: &str,
) -> actix_web::Result<Option<(Course, Session)>> {
    let Some(session) = state.sessions.get(session_id).await.map_err(storage_failure)? else {
        return Ok(None);
    };
    if session.course_id != course_id {
        return Ok(None);
    }
    let course = state.courses.get(course_id).await.map_err(storage_failure)?;
    Ok(course.map(|c| (c, session)))
}

/// Check-in page data
#[utoipa::path(
    get,
    path = "/checkin/{course_id}/{session_id}",
    params(
        ("course_id", Path, description = "Course ID"),
        ("session_id", Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = CheckInPage),
        (status = 404, description = "Unknown link", body = Object, example = json!({
            "error": "SessionNotFound",
            "message": "This check-in link is not valid"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Check-in"
)]
pub async fn checkin_page(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<HttpResponse> {
    let (course_id, session_id) = path.into_inner();

    let Some((course, session)) = resolve(&state, &course_id, &session_id).await? else {
        return Ok(session_not_found());
    };

    Ok(HttpResponse::Ok().json(CheckInPage {
        course_id: course.id,
        course_name: course.name,
        open: session.is_active(),
        session_id: session.id,
        date: session.date,
        start_time: session.start_time,
    }))
}

/// Student check-in
#[utoipa::path(
    post,
    path = "/checkin/{course_id}/{session_id}",
    params(
        ("course_id", Path, description = "Course ID"),
        ("session_id", Path, description = "Session ID")
    ),
    request_body = CheckInForm,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Empty name"),
        (status = 403, description = "Too far from the classroom", body = Object, example = json!({
            "error": "TooFar",
            "message": "You are too far from the classroom (153.4 m away)",
            "distanceMeters": 153.4
        })),
        (status = 404, description = "Unknown link or name not on the roster", body = Object, example = json!({
            "error": "NotFound",
            "message": "Your name was not found in the course roster"
        })),
        (status = 409, description = "Check-in not open", body = Object, example = json!({
            "error": "SessionNotActive",
            "message": "Check-in for this session is not open"
        })),
        (status = 422, description = "Device location unavailable", body = Object, example = json!({
            "error": "LocationUnavailable",
            "message": "Could not get your location: User denied Geolocation"
        })),
        (status = 500, description = "Attendance could not be saved")
    ),
    tag = "Check-in"
)]
#[instrument(
    name = "check_in",
    skip(state, path, form),
    fields(course_id = %path.0, session_id = %path.1)
)]
pub async fn check_in(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    form: web::Json<CheckInForm>,
) -> actix_web::Result<HttpResponse> {
    let (course_id, session_id) = path.into_inner();

    if form.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "InvalidName",
            "message": "Please enter your name"
        })));
    }

    let Some((_, session)) = resolve(&state, &course_id, &session_id).await? else {
        info!("Check-in link did not resolve to a session");
        return Ok(session_not_found());
    };

    match state.evaluator.evaluate(&session, &form.name, &*form).await {
        Ok(receipt) => {
            info!(
                student_id = %receipt.student_id,
                distance_meters = receipt.distance_meters,
                "Check-in accepted"
            );
            Ok(HttpResponse::Ok().json(CheckInResponse {
                message: format!(
                    "Welcome, {}! You are marked {}.",
                    receipt.student_name, receipt.status
                ),
                student_name: receipt.student_name,
                status: receipt.status,
                time: receipt.time,
            }))
        }
        Err(e) => {
            match &e {
                CheckInError::PersistenceFailure(cause) => {
                    error!(error = %cause, "Check-in could not be saved")
                }
                rejected => info!(reason = rejected.kind(), "Check-in rejected"),
            }
            Err(e.into())
        }
    }
}
