use anyhow::Result;
use futures::lock::Mutex;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::model::student::Student;
use crate::store::CourseStore;

/// courseId => roster
///
/// Fills are tagged with the generation seen before the roster was read.
/// `invalidate` bumps the generation, so a fill that raced an invalidation
/// is dropped instead of restoring the old roster.
#[derive(Clone)]
pub struct RosterCache {
    cache: Cache<String, Arc<Vec<Student>>>,
    generation: Arc<Mutex<u64>>,
}

impl RosterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(10_000) // one entry per course
                .time_to_live(ttl)
                .build(),
            generation: Arc::new(Mutex::new(0)),
        }
    }

    pub async fn get(&self, course_id: &str) -> Option<Arc<Vec<Student>>> {
        self.cache.get(course_id).await
    }

    /// Take this before reading a roster from storage.
    pub async fn generation(&self) -> u64 {
        *self.generation.lock().await
    }

    /// Caches `roster` unless an invalidation happened after `seen` was taken.
    pub async fn fill(&self, course_id: &str, roster: Arc<Vec<Student>>, seen: u64) -> bool {
        let generation = self.generation.lock().await;
        if *generation != seen {
            return false;
        }
        self.cache.insert(course_id.to_string(), roster).await;
        true
    }

    /// Drop a cached roster after the course changed
    pub async fn invalidate(&self, course_id: &str) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.cache.invalidate(course_id).await;
    }
}

/// Load every course roster into the cache
pub async fn warmup_roster_cache(cache: &RosterCache, courses: &CourseStore) -> Result<()> {
    let seen = cache.generation().await;
    let courses = courses.list().await?;

    let futures: Vec<_> = courses
        .iter()
        .map(|c| cache.fill(&c.id, Arc::new(c.students.clone()), seen))
        .collect();

    // Await all insertions concurrently
    let filled = futures::future::join_all(futures)
        .await
        .into_iter()
        .filter(|ok| *ok)
        .count();

    log::info!(
        "Roster cache warmup complete: {filled} of {} courses",
        courses.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::Course;
    use crate::store::MemoryBlobStore;

    #[actix_web::test]
    async fn warmup_fills_and_invalidate_clears() {
        let courses = CourseStore::new(Arc::new(MemoryBlobStore::new()));
        let course = courses
            .create(Course::new("Art".into(), None, vec![Student::new("Frida")]))
            .await
            .unwrap();

        let cache = RosterCache::new(Duration::from_secs(60));
        warmup_roster_cache(&cache, &courses).await.unwrap();
        assert_eq!(cache.get(&course.id).await.unwrap()[0].name, "Frida");

        cache.invalidate(&course.id).await;
        assert!(cache.get(&course.id).await.is_none());
    }

    #[actix_web::test]
    async fn fill_after_invalidation_is_dropped() {
        let cache = RosterCache::new(Duration::from_secs(60));
        let seen = cache.generation().await;

        cache.invalidate("c1").await;
        assert!(!cache.fill("c1", Arc::new(vec![Student::new("Old")]), seen).await);
        assert!(cache.get("c1").await.is_none());

        let seen = cache.generation().await;
        assert!(cache.fill("c1", Arc::new(vec![Student::new("New")]), seen).await);
        assert_eq!(cache.get("c1").await.unwrap()[0].name, "New");
    }
}
