use crate::ai::{RemediationRequest, RemediationSuggestion};
use crate::api::checkin::{CheckInForm, CheckInPage, CheckInResponse};
use crate::api::course::{AddStudent, CreateCourse};
use crate::api::session::{CreateSession, SessionResponse};
use crate::attendance::analytics::{
    AttendanceCounts, CourseAnalytics, RosterEntry, SessionDashboard, SessionSummary,
    StudentSummary,
};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, RosterStatus},
    course::Course,
    geo::GeoPoint,
    session::Session,
    student::Student,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = r#"
## Classroom attendance

Teachers create **courses** (with a roster) and **sessions**, then open
check-in from the classroom. Students scan the session's check-in link and
submit their name together with their device location.

### Check-in rules
- The session must be open (the teacher shared a location)
- The student must be within **100 m** of the teacher
- The name must match a roster entry (case-insensitive)
- Later than `startTime + checkinTimeLimit` minutes is recorded as **Late**

### Extras
- Live per-session dashboard and per-course analytics
- AI-suggested remediation for reported attendance issues

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::checkin::checkin_page,
        crate::api::checkin::check_in,

        crate::api::course::create_course,
        crate::api::course::list_courses,
        crate::api::course::get_course,
        crate::api::course::add_student,

        crate::api::session::create_session,
        crate::api::session::list_sessions,
        crate::api::session::get_session,
        crate::api::session::activate_session,
        crate::api::session::deactivate_session,

        crate::api::analytics::session_attendance,
        crate::api::analytics::course_report,

        crate::api::remediation::suggest_remediation
    ),
    components(
        schemas(
            CheckInForm,
            CheckInPage,
            CheckInResponse,
            CreateCourse,
            AddStudent,
            CreateSession,
            SessionResponse,
            Course,
            Student,
            Session,
            GeoPoint,
            AttendanceRecord,
            AttendanceStatus,
            RosterStatus,
            RosterEntry,
            AttendanceCounts,
            SessionDashboard,
            SessionSummary,
            StudentSummary,
            CourseAnalytics,
            RemediationRequest,
            RemediationSuggestion
        )
    ),
    tags(
        (name = "Check-in", description = "Student check-in link"),
        (name = "Course", description = "Course and roster management"),
        (name = "Session", description = "Session scheduling and check-in window"),
        (name = "Attendance", description = "Dashboards and analytics"),
        (name = "Remediation", description = "AI-suggested fixes for attendance issues"),
    )
)]
pub struct ApiDoc;
