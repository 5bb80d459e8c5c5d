use anyhow::Result;

use crate::model::{course::Course, student::Student};
use crate::store::CourseStore;

const DEMO_ROSTER: [&str; 5] = [
    "Ada Lovelace",
    "Alan Turing",
    "Grace Hopper",
    "Edsger Dijkstra",
    "Barbara Liskov",
];

/// Create a demo course when nothing is stored yet. Returns whether one was created.
pub async fn seed_demo_course(courses: &CourseStore) -> Result<bool> {
    if !courses.list().await?.is_empty() {
        return Ok(false);
    }

    let roster = DEMO_ROSTER.iter().map(|name| Student::new(*name)).collect();
    let course = courses
        .create(Course::new(
            "Introduction to Computer Science".to_string(),
            Some("Demo course".to_string()),
            roster,
        ))
        .await?;

    log::info!("Seeded demo course {} with {} students", course.id, course.students.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;
    use std::sync::Arc;

    #[actix_web::test]
    async fn seeds_only_once() {
        let courses = CourseStore::new(Arc::new(MemoryBlobStore::new()));
        assert!(seed_demo_course(&courses).await.unwrap());
        assert!(!seed_demo_course(&courses).await.unwrap());

        let stored = courses.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].students.len(), DEMO_ROSTER.len());
    }
}
