use futures::lock::Mutex;
use std::sync::Arc;

use super::{BlobStore, StoreError, load_json, save_json};
use crate::model::{course::Course, student::Student};

pub const COURSES_KEY: &str = "courses";

#[derive(Clone)]
pub struct CourseStore {
    blob: Arc<dyn BlobStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CourseStore {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<Course>, StoreError> {
        load_json(self.blob.as_ref(), COURSES_KEY).await
    }

    pub async fn get(&self, course_id: &str) -> Result<Option<Course>, StoreError> {
        Ok(self.list().await?.into_iter().find(|c| c.id == course_id))
    }

    pub async fn create(&self, course: Course) -> Result<Course, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut courses = self.list().await?;
        courses.push(course.clone());
        save_json(self.blob.as_ref(), COURSES_KEY, &courses).await?;

        Ok(course)
    }

    /// Appends a student to the roster. `None` when the course does not exist.
    pub async fn add_student(
        &self,
        course_id: &str,
        student: Student,
    ) -> Result<Option<Student>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut courses = self.list().await?;
        let Some(course) = courses.iter_mut().find(|c| c.id == course_id) else {
            return Ok(None);
        };
        course.students.push(student.clone());
        save_json(self.blob.as_ref(), COURSES_KEY, &courses).await?;

        Ok(Some(student))
    }
}
