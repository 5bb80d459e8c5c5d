use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    attendance::{AttendanceBook, RosterStatus, SessionAttendance},
    course::Course,
    session::Session,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student_id: String,
    pub name: String,
    pub status: RosterStatus,
    /// Check-in time, absent for students without a record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCounts {
    pub present: usize,
    pub late: usize,
    pub absent: usize,
    /// (present + late) / total, 0 when there is nothing to count.
    pub attendance_rate: f64,
}

impl AttendanceCounts {
    fn add(&mut self, status: RosterStatus) {
        match status {
            RosterStatus::Present => self.present += 1,
            RosterStatus::Late => self.late += 1,
            RosterStatus::Absent => self.absent += 1,
        }
    }

    fn finish(mut self) -> Self {
        let total = self.present + self.late + self.absent;
        self.attendance_rate = if total == 0 {
            0.0
        } else {
            (self.present + self.late) as f64 / total as f64
        };
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDashboard {
    pub session_id: String,
    pub course_id: String,
    pub active: bool,
    pub students: Vec<RosterEntry>,
    pub counts: AttendanceCounts,
}

/// Every roster student with their status; no record means absent.
pub fn session_dashboard(
    course: &Course,
    session: &Session,
    records: &SessionAttendance,
) -> SessionDashboard {
    let mut counts = AttendanceCounts::default();
    let students = course
        .students
        .iter()
        .map(|student| {
            let record = records.get(&student.id);
            let status = record.map_or(RosterStatus::Absent, |r| r.status.into());
            counts.add(status);
            RosterEntry {
                student_id: student.id.clone(),
                name: student.name.clone(),
                status,
                time: record.map(|r| r.time.clone()),
            }
        })
        .collect();

    SessionDashboard {
        session_id: session.id.clone(),
        course_id: course.id.clone(),
        active: session.is_active(),
        students,
        counts: counts.finish(),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    #[schema(example = "2025-01-10", format = "date", value_type = String)]
    pub date: chrono::NaiveDate,
    #[serde(flatten)]
    pub counts: AttendanceCounts,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: String,
    pub name: String,
    #[serde(flatten)]
    pub counts: AttendanceCounts,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub course_id: String,
    pub total_sessions: usize,
    pub overall: AttendanceCounts,
    pub sessions: Vec<SessionSummary>,
    pub students: Vec<StudentSummary>,
}

/// Only records of roster students are counted.
pub fn course_analytics(course: &Course, sessions: &[Session], book: &AttendanceBook) -> CourseAnalytics {
    let empty = SessionAttendance::new();
    let mut overall = AttendanceCounts::default();
    let mut per_student = vec![AttendanceCounts::default(); course.students.len()];

    let session_summaries = sessions
        .iter()
        .map(|session| {
            let records = book.get(&session.id).unwrap_or(&empty);
            let mut counts = AttendanceCounts::default();
            for (student, student_counts) in course.students.iter().zip(per_student.iter_mut()) {
                let status = records
                    .get(&student.id)
                    .map_or(RosterStatus::Absent, |r| r.status.into());
                counts.add(status);
                student_counts.add(status);
                overall.add(status);
            }
            SessionSummary {
                session_id: session.id.clone(),
                date: session.date,
                counts: counts.finish(),
            }
        })
        .collect();

    let students = course
        .students
        .iter()
        .zip(per_student)
        .map(|(student, counts)| StudentSummary {
            student_id: student.id.clone(),
            name: student.name.clone(),
            counts: counts.finish(),
        })
        .collect();

    CourseAnalytics {
        course_id: course.id.clone(),
        total_sessions: sessions.len(),
        overall: overall.finish(),
        sessions: session_summaries,
        students,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        attendance::{AttendanceRecord, AttendanceStatus},
        student::Student,
    };
    use chrono::NaiveDate;

    fn course() -> Course {
        Course {
            id: "c".into(),
            name: "Course".into(),
            description: None,
            students: vec![
                Student {
                    id: "a".into(),
                    name: "Ann".into(),
                },
                Student {
                    id: "b".into(),
                    name: "Ben".into(),
                },
            ],
        }
    }

    fn session(id: &str, day: u32) -> Session {
        let mut s = Session::new("c".into(), NaiveDate::from_ymd_opt(2025, 2, day).unwrap(), None, None);
        s.id = id.into();
        s
    }

    fn record(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            status,
            time: "10:00:00 AM".into(),
        }
    }

    #[test]
    fn dashboard_marks_missing_students_absent() {
        let mut records = SessionAttendance::new();
        records.insert("a".into(), record(AttendanceStatus::Late));
        records.insert("ghost".into(), record(AttendanceStatus::Present));

        let dash = session_dashboard(&course(), &session("s1", 1), &records);
        assert_eq!(dash.students[0].status, RosterStatus::Late);
        assert_eq!(dash.students[0].time.as_deref(), Some("10:00:00 AM"));
        assert_eq!(dash.students[1].status, RosterStatus::Absent);
        assert_eq!(dash.students[1].time, None);
        assert_eq!(
            dash.counts,
            AttendanceCounts {
                present: 0,
                late: 1,
                absent: 1,
                attendance_rate: 0.5
            }
        );
    }

    #[test]
    fn analytics_per_session_and_per_student() {
        let mut book = AttendanceBook::new();
        book.entry("s1".into())
            .or_default()
            .insert("a".into(), record(AttendanceStatus::Present));
        book.entry("s1".into())
            .or_default()
            .insert("b".into(), record(AttendanceStatus::Late));
        book.entry("s2".into())
            .or_default()
            .insert("a".into(), record(AttendanceStatus::Present));

        let report = course_analytics(&course(), &[session("s1", 1), session("s2", 2)], &book);

        assert_eq!(report.total_sessions, 2);
        assert_eq!(report.sessions[0].counts.attendance_rate, 1.0);
        assert_eq!(report.sessions[1].counts.absent, 1);
        assert_eq!(report.students[0].counts.present, 2);
        assert_eq!(report.students[1].counts.late, 1);
        assert_eq!(report.students[1].counts.absent, 1);
        assert_eq!(report.overall.attendance_rate, 0.75);
    }

    #[test]
    fn empty_course_has_zero_rate() {
        let report = course_analytics(&course(), &[], &AttendanceBook::new());
        assert_eq!(report.overall.attendance_rate, 0.0);
        assert_eq!(report.students[0].counts, AttendanceCounts::default());
    }

    #[test]
    fn summaries_flatten_counts() {
        let summary = StudentSummary {
            student_id: "a".into(),
            name: "Ann".into(),
            counts: AttendanceCounts {
                late: 1,
                attendance_rate: 1.0,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["late"], 1);
        assert_eq!(json["attendanceRate"], 1.0);
    }
}
