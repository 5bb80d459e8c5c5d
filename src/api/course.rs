use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use super::storage_failure;
use crate::model::{course::Course, student::Student};
use crate::state::AppState;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateCourse {
    #[schema(example = "Distributed Systems")]
    pub name: String,
    #[schema(example = "Tuesday lab group")]
    pub description: Option<String>,
    /// Roster, one entry per student name
    #[serde(default)]
    #[schema(example = json!(["Ada Lovelace", "Alan Turing"]))]
    pub students: Vec<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct AddStudent {
    #[schema(example = "Grace Hopper")]
    pub name: String,
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "message": message }))
}

/// Create Course
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourse,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid course", body = Object, example = json!({
            "message": "Student names must not be empty"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Course"
)]
pub async fn create_course(
    state: web::Data<AppState>,
    payload: web::Json<CreateCourse>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(bad_request("Course name must not be empty"));
    }

    let mut students = Vec::with_capacity(payload.students.len());
    for student in &payload.students {
        let student = student.trim();
        if student.is_empty() {
            return Ok(bad_request("Student names must not be empty"));
        }
        students.push(Student::new(student));
    }

    let description = payload
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let course = state
        .courses
        .create(Course::new(name.to_string(), description, students))
        .await
        .map_err(storage_failure)?;

    info!(course_id = %course.id, students = course.students.len(), "Course created");
    Ok(HttpResponse::Created().json(course))
}

/// List Courses
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All courses", body = Vec<Course>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Course"
)]
pub async fn list_courses(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let courses = state.courses.list().await.map_err(storage_failure)?;
    Ok(HttpResponse::Ok().json(courses))
}

/// Get Course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(
        ("course_id", Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course not found", body = Object, example = json!({
            "message": "Course not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Course"
)]
pub async fn get_course(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let course_id = path.into_inner();

    match state.courses.get(&course_id).await.map_err(storage_failure)? {
        Some(course) => Ok(HttpResponse::Ok().json(course)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Course not found"
        }))),
    }
}

/// Add Student to Course roster
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/students",
    params(
        ("course_id", Path, description = "Course ID")
    ),
    request_body = AddStudent,
    responses(
        (status = 201, description = "Student added", body = Student),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Course"
)]
pub async fn add_student(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AddStudent>,
) -> actix_web::Result<impl Responder> {
    let course_id = path.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(bad_request("Student name must not be empty"));
    }

    let added = state
        .courses
        .add_student(&course_id, Student::new(name))
        .await
        .map_err(storage_failure)?;

    match added {
        Some(student) => {
            state.roster.invalidate(&course_id).await;
            info!(course_id = %course_id, student_id = %student.id, "Student added");
            Ok(HttpResponse::Created().json(student))
        }
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Course not found"
        }))),
    }
}
