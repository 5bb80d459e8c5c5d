use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use super::storage_failure;
use crate::attendance::analytics::{CourseAnalytics, SessionDashboard, course_analytics, session_dashboard};
use crate::state::AppState;

/// Live attendance for one session
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}/attendance",
    params(
        ("session_id", Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Roster with attendance status", body = SessionDashboard),
        (status = 404, description = "Session not found", body = Object, example = json!({
            "message": "Session not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn session_attendance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let session_id = path.into_inner();

    let Some(session) = state.sessions.get(&session_id).await.map_err(storage_failure)? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Session not found"
        })));
    };
    let Some(course) = state
        .courses
        .get(&session.course_id)
        .await
        .map_err(storage_failure)?
    else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Course not found"
        })));
    };

    let records = state
        .attendance
        .session_records(&session.id)
        .await
        .map_err(storage_failure)?;

    Ok(HttpResponse::Ok().json(session_dashboard(&course, &session, &records)))
}

/// Attendance analytics for a course
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/analytics",
    params(
        ("course_id", Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Per-session and per-student attendance", body = CourseAnalytics),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn course_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let course_id = path.into_inner();

    let Some(course) = state.courses.get(&course_id).await.map_err(storage_failure)? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Course not found"
        })));
    };
    let sessions = state
        .sessions
        .list_for_course(&course.id)
        .await
        .map_err(storage_failure)?;
    let book = state.attendance.load().await.map_err(storage_failure)?;

    Ok(HttpResponse::Ok().json(course_analytics(&course, &sessions, &book)))
}
