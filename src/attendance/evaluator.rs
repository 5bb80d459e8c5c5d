use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use derive_more::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{lateness, proximity, roster::RosterLookup, store::AttendanceStore};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    geo::GeoPoint,
    session::Session,
};
use crate::store::StoreError;

/// Where the submitting device says it is.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> Result<GeoPoint, String>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the server's local time zone; session times are local too.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Display)]
pub enum CheckInError {
    #[display(fmt = "Check-in for this session is not open")]
    SessionNotActive,
    #[display(fmt = "Could not get your location: {}", _0)]
    LocationUnavailable(String),
    #[display(fmt = "You are too far from the classroom ({:.1} m away)", _0)]
    TooFar(f64),
    #[display(fmt = "Your name was not found in the course roster")]
    NotFound,
    #[display(fmt = "Attendance could not be saved")]
    PersistenceFailure(StoreError),
}

impl std::error::Error for CheckInError {}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckInReceipt {
    pub student_id: String,
    pub student_name: String,
    pub status: AttendanceStatus,
    pub time: String,
    pub distance_meters: f64,
}

/// Validates a check-in and records it. Every guard runs before the store
/// is touched, so a rejected submission leaves no trace.
#[derive(Clone)]
pub struct CheckInEvaluator {
    attendance: AttendanceStore,
    roster: RosterLookup,
    clock: Arc<dyn Clock>,
}

impl CheckInEvaluator {
    pub fn new(attendance: AttendanceStore, roster: RosterLookup, clock: Arc<dyn Clock>) -> Self {
        Self {
            attendance,
            roster,
            clock,
        }
    }

    pub async fn evaluate(
        &self,
        session: &Session,
        name: &str,
        location: &dyn LocationSource,
    ) -> Result<CheckInReceipt, CheckInError> {
        let Some(teacher_location) = session.teacher_location else {
            return Err(CheckInError::SessionNotActive);
        };

        let submitted = location
            .current_location()
            .await
            .map_err(CheckInError::LocationUnavailable)?;

        let proximity = proximity::check(teacher_location, submitted);
        debug!(
            session_id = %session.id,
            distance_meters = proximity.distance_meters,
            "Proximity checked"
        );
        if !proximity.within_range {
            return Err(CheckInError::TooFar(proximity::reported_meters(
                proximity.distance_meters,
            )));
        }

        let student = self
            .roster
            .find(&session.course_id, name)
            .await
            .map_err(CheckInError::PersistenceFailure)?
            .ok_or(CheckInError::NotFound)?;

        let now = self.clock.now();
        let status = lateness::classify(session, now);
        let record = AttendanceRecord {
            status,
            time: now.format("%-I:%M:%S %p").to_string(),
        };

        let previous = self
            .attendance
            .put(&session.id, &student.id, record.clone())
            .await
            .map_err(CheckInError::PersistenceFailure)?;

        if let Some(previous) = previous {
            // Resubmission replaces the earlier record, including a Late one.
            warn!(
                session_id = %session.id,
                student_id = %student.id,
                previous_status = %previous.status,
                new_status = %status,
                "Check-in overwrote an existing record"
            );
        }

        info!(
            session_id = %session.id,
            student_id = %student.id,
            status = %status,
            "Check-in recorded"
        );

        Ok(CheckInReceipt {
            student_id: student.id,
            student_name: student.name,
            status,
            time: record.time,
            distance_meters: proximity.distance_meters,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{course::Course, student::Student};
    use crate::store::{CourseStore, MemoryBlobStore};
    use crate::utils::roster_cache::RosterCache;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    pub struct FixedClock(pub NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    /// Location source that counts how often it was asked.
    pub struct FakeDevice {
        answer: Result<GeoPoint, String>,
        pub asked: AtomicUsize,
    }

    impl FakeDevice {
        pub fn at(latitude: f64, longitude: f64) -> Self {
            Self {
                answer: Ok(GeoPoint::new(latitude, longitude)),
                asked: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                answer: Err(message.to_string()),
                asked: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LocationSource for FakeDevice {
        async fn current_location(&self) -> Result<GeoPoint, String> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    struct Fixture {
        blob: MemoryBlobStore,
        attendance: AttendanceStore,
        course: Course,
        session: Session,
    }

    impl Fixture {
        async fn new() -> Self {
            let blob = MemoryBlobStore::new();
            let courses = CourseStore::new(Arc::new(blob.clone()));
            let course = courses
                .create(Course::new(
                    "Databases".into(),
                    None,
                    vec![Student::new("Grace Hopper"), Student::new("Edsger Dijkstra")],
                ))
                .await
                .unwrap();

            let mut session = Session::new(
                course.id.clone(),
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0),
                Some(10),
            );
            session.teacher_location = Some(GeoPoint::new(0.0, 0.0));

            Self {
                attendance: AttendanceStore::new(Arc::new(blob.clone())),
                blob,
                course,
                session,
            }
        }

        fn evaluator_at(&self, h: u32, m: u32, s: u32) -> CheckInEvaluator {
            let courses = CourseStore::new(Arc::new(self.blob.clone()));
            let roster = RosterLookup::new(courses, RosterCache::new(Duration::from_secs(60)));
            let now = self.session.date.and_hms_opt(h, m, s).unwrap();
            CheckInEvaluator::new(self.attendance.clone(), roster, Arc::new(FixedClock(now)))
        }

        fn student_id(&self, name: &str) -> String {
            self.course
                .students
                .iter()
                .find(|s| s.name == name)
                .unwrap()
                .id
                .clone()
        }
    }

    #[actix_web::test]
    async fn on_time_check_in_is_present() {
        let fx = Fixture::new().await;
        let receipt = fx
            .evaluator_at(9, 9, 59)
            .evaluate(&fx.session, "grace hopper", &FakeDevice::at(0.0, 0.0005))
            .await
            .unwrap();

        assert_eq!(receipt.student_name, "Grace Hopper");
        assert_eq!(receipt.status, AttendanceStatus::Present);
        assert_eq!(receipt.time, "9:09:59 AM");

        let records = fx.attendance.session_records(&fx.session.id).await.unwrap();
        assert_eq!(records[&fx.student_id("Grace Hopper")].status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn after_grace_period_is_late() {
        let fx = Fixture::new().await;
        let receipt = fx
            .evaluator_at(9, 10, 1)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap();
        assert_eq!(receipt.status, AttendanceStatus::Late);
    }

    #[actix_web::test]
    async fn exactly_at_deadline_is_present() {
        let fx = Fixture::new().await;
        let receipt = fx
            .evaluator_at(9, 10, 0)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap();
        assert_eq!(receipt.status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn inactive_session_never_asks_for_location() {
        let mut fx = Fixture::new().await;
        fx.session.teacher_location = None;
        let device = FakeDevice::at(0.0, 0.0);

        let err = fx
            .evaluator_at(9, 0, 0)
            .evaluate(&fx.session, "Grace Hopper", &device)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckInError::SessionNotActive));
        assert_eq!(device.asked.load(Ordering::SeqCst), 0);
        assert!(fx.attendance.load().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn location_failure_is_not_a_proximity_failure() {
        let fx = Fixture::new().await;
        let err = fx
            .evaluator_at(9, 0, 0)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::failing("User denied Geolocation"))
            .await
            .unwrap_err();

        match err {
            CheckInError::LocationUnavailable(msg) => assert_eq!(msg, "User denied Geolocation"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(fx.attendance.load().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn too_far_reports_distance_and_writes_nothing() {
        let fx = Fixture::new().await;
        let err = fx
            .evaluator_at(9, 0, 0)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.00090))
            .await
            .unwrap_err();

        match err {
            CheckInError::TooFar(d) => assert_eq!(d, 100.1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(fx.attendance.load().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unknown_name_is_rejected() {
        let fx = Fixture::new().await;
        let err = fx
            .evaluator_at(9, 0, 0)
            .evaluate(&fx.session, "Grace", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckInError::NotFound));
        assert!(fx.attendance.load().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn rejection_leaves_existing_record_untouched() {
        let fx = Fixture::new().await;
        fx.evaluator_at(9, 12, 0)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap();
        let before = fx.attendance.load().await.unwrap();

        let err = fx
            .evaluator_at(9, 1, 0)
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.01))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckInError::TooFar(_)));
        assert_eq!(fx.attendance.load().await.unwrap(), before);
    }

    #[actix_web::test]
    async fn resubmission_overwrites_previous_status() {
        let fx = Fixture::new().await;
        let student_id = fx.student_id("Edsger Dijkstra");

        fx.evaluator_at(9, 30, 0)
            .evaluate(&fx.session, "Edsger Dijkstra", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap();
        let records = fx.attendance.session_records(&fx.session.id).await.unwrap();
        assert_eq!(records[&student_id].status, AttendanceStatus::Late);

        fx.evaluator_at(9, 5, 0)
            .evaluate(&fx.session, "Edsger Dijkstra", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap();
        let records = fx.attendance.session_records(&fx.session.id).await.unwrap();
        assert_eq!(records[&student_id].status, AttendanceStatus::Present);
        assert_eq!(records.len(), 1);
    }

    #[actix_web::test]
    async fn write_failure_surfaces_as_persistence_failure() {
        let fx = Fixture::new().await;
        let evaluator = fx.evaluator_at(9, 0, 0);
        fx.blob.fail_writes(true);

        let err = evaluator
            .evaluate(&fx.session, "Grace Hopper", &FakeDevice::at(0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckInError::PersistenceFailure(_)));
    }

    #[test]
    fn error_messages_distinguish_causes() {
        assert_eq!(
            CheckInError::TooFar(153.4).to_string(),
            "You are too far from the classroom (153.4 m away)"
        );
        assert!(CheckInError::NotFound.to_string().contains("roster"));
        assert!(
            CheckInError::LocationUnavailable("timeout".into())
                .to_string()
                .ends_with("timeout")
        );
    }
}
