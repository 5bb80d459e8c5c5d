use std::sync::Arc;
use std::time::Duration;

use crate::ai::{RemediationService, TextGenerator};
use crate::attendance::{AttendanceStore, CheckInEvaluator, Clock, RosterLookup};
use crate::config::Config;
use crate::store::{BlobStore, CourseStore, SessionStore};
use crate::utils::roster_cache::RosterCache;

/// Everything the handlers share. Stores wrap one injected blob backend.
#[derive(Clone)]
pub struct AppState {
    pub courses: CourseStore,
    pub sessions: SessionStore,
    pub attendance: AttendanceStore,
    pub roster: RosterLookup,
    pub roster_cache: RosterCache,
    pub evaluator: CheckInEvaluator,
    pub remediation: RemediationService,
}

impl AppState {
    pub fn new(
        blob: Arc<dyn BlobStore>,
        config: &Config,
        generator: Arc<dyn TextGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let courses = CourseStore::new(blob.clone());
        let sessions = SessionStore::new(blob.clone());
        let attendance = AttendanceStore::new(blob);

        let roster_cache = RosterCache::new(Duration::from_secs(config.roster_cache_ttl_secs));
        let roster = RosterLookup::new(courses.clone(), roster_cache.clone());
        let evaluator = CheckInEvaluator::new(attendance.clone(), roster.clone(), clock);

        Self {
            courses,
            sessions,
            attendance,
            roster,
            roster_cache,
            evaluator,
            remediation: RemediationService::new(generator),
        }
    }
}
