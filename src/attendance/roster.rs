use std::sync::Arc;

use crate::model::student::Student;
use crate::store::{CourseStore, StoreError};
use crate::utils::roster_cache::RosterCache;

/// Case-insensitive exact match; the first student with that name wins.
pub fn find_by_name<'a>(roster: &'a [Student], name: &str) -> Option<&'a Student> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    roster.iter().find(|s| s.name.trim().to_lowercase() == wanted)
}

#[derive(Clone)]
pub struct RosterLookup {
    courses: CourseStore,
    cache: RosterCache,
}

impl RosterLookup {
    pub fn new(courses: CourseStore, cache: RosterCache) -> Self {
        Self { courses, cache }
    }

    /// Roster of a course; an unknown course has an empty roster.
    pub async fn roster(&self, course_id: &str) -> Result<Arc<Vec<Student>>, StoreError> {
        if let Some(roster) = self.cache.get(course_id).await {
            return Ok(roster);
        }

        let seen = self.cache.generation().await;
        let roster = Arc::new(
            self.courses
                .get(course_id)
                .await?
                .map(|c| c.students)
                .unwrap_or_default(),
        );
        self.cache.fill(course_id, roster.clone(), seen).await;
        Ok(roster)
    }

    pub async fn find(&self, course_id: &str, name: &str) -> Result<Option<Student>, StoreError> {
        let roster = self.roster(course_id).await?;
        Ok(find_by_name(&roster, name).cloned())
    }

    pub async fn invalidate(&self, course_id: &str) {
        self.cache.invalidate(course_id).await;
    }
}
