use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use super::storage_failure;
use crate::model::{
    geo::GeoPoint,
    session::{Session, clock_time},
};
use crate::state::AppState;

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    #[schema(example = "2025-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    /// Minutes after start time that still count as on time
    #[schema(example = 10)]
    pub checkin_time_limit: Option<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: Session,
    pub active: bool,
    /// Link students scan to check in
    #[schema(example = "/checkin/c1/9b2d7e0c-4d2c-4c1f-8a5e-1f0c7b3a2e44")]
    pub checkin_url: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            active: session.is_active(),
            checkin_url: session.checkin_path(),
            session,
        }
    }
}

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "message": "Session not found"
    }))
}

/// Create Session for a course
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/sessions",
    params(
        ("course_id", Path, description = "Course ID")
    ),
    request_body = CreateSession,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn create_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CreateSession>,
) -> actix_web::Result<impl Responder> {
    let course_id = path.into_inner();
    let payload = payload.into_inner();

    if state
        .courses
        .get(&course_id)
        .await
        .map_err(storage_failure)?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Course not found"
        })));
    }

    let session = state
        .sessions
        .create(Session::new(
            course_id,
            payload.date,
            payload.start_time,
            payload.checkin_time_limit,
        ))
        .await
        .map_err(storage_failure)?;

    info!(session_id = %session.id, course_id = %session.course_id, "Session created");
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// List Sessions of a course
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/sessions",
    params(
        ("course_id", Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Sessions, newest first", body = Vec<SessionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn list_sessions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let course_id = path.into_inner();

    let sessions: Vec<SessionResponse> = state
        .sessions
        .list_for_course(&course_id)
        .await
        .map_err(storage_failure)?
        .into_iter()
        .map(SessionResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(sessions))
}

/// Get Session by ID
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    params(
        ("session_id", Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let session_id = path.into_inner();

    match state.sessions.get(&session_id).await.map_err(storage_failure)? {
        Some(session) => Ok(HttpResponse::Ok().json(SessionResponse::from(session))),
        None => Ok(session_not_found()),
    }
}

/// Open check-in at the teacher's current location
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/activate",
    params(
        ("session_id", Path, description = "Session ID")
    ),
    request_body = GeoPoint,
    responses(
        (status = 200, description = "Check-in opened", body = SessionResponse),
        (status = 400, description = "Invalid coordinates"),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn activate_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<GeoPoint>,
) -> actix_web::Result<impl Responder> {
    let session_id = path.into_inner();
    let location = payload.into_inner();

    if !location.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Latitude must be within [-90, 90] and longitude within [-180, 180]"
        })));
    }

    match state
        .sessions
        .set_teacher_location(&session_id, Some(location))
        .await
        .map_err(storage_failure)?
    {
        Some(session) => {
            info!(session_id = %session.id, "Check-in opened");
            Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
        }
        None => Ok(session_not_found()),
    }
}

/// Close check-in
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/deactivate",
    params(
        ("session_id", Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Check-in closed", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn deactivate_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let session_id = path.into_inner();

    match state
        .sessions
        .set_teacher_location(&session_id, None)
        .await
        .map_err(storage_failure)?
    {
        Some(session) => {
            info!(session_id = %session.id, "Check-in closed");
            Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
        }
        None => Ok(session_not_found()),
    }
}
