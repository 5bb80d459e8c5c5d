use futures::lock::Mutex;
use std::sync::Arc;

use super::{BlobStore, StoreError, load_json, save_json};
use crate::model::{geo::GeoPoint, session::Session};

pub const SESSIONS_KEY: &str = "sessions";

#[derive(Clone)]
pub struct SessionStore {
    blob: Arc<dyn BlobStore>,
    write_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<Session>, StoreError> {
        load_json(self.blob.as_ref(), SESSIONS_KEY).await
    }

    /// Sessions of one course, most recent date first.
    pub async fn list_for_course(&self, course_id: &str) -> Result<Vec<Session>, StoreError> {
        let mut sessions: Vec<Session> = self
            .list()
            .await?
            .into_iter()
            .filter(|s| s.course_id == course_id)
            .collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date).then(b.start_time.cmp(&a.start_time)));
        Ok(sessions)
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.list().await?.into_iter().find(|s| s.id == session_id))
    }

    pub async fn create(&self, session: Session) -> Result<Session, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut sessions = self.list().await?;
        sessions.push(session.clone());
        save_json(self.blob.as_ref(), SESSIONS_KEY, &sessions).await?;

        Ok(session)
    }

    /// Opens (`Some`) or closes (`None`) check-in for a session.
    pub async fn set_teacher_location(
        &self,
        session_id: &str,
        location: Option<GeoPoint>,
    ) -> Result<Option<Session>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut sessions = self.list().await?;
        let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) else {
            return Ok(None);
        };
        session.teacher_location = location;
        let updated = session.clone();
        save_json(self.blob.as_ref(), SESSIONS_KEY, &sessions).await?;

        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;
    use chrono::NaiveDate;

    fn session(course_id: &str, day: u32) -> Session {
        Session::new(
            course_id.to_string(),
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            None,
            None,
        )
    }

    #[actix_web::test]
    async fn list_for_course_filters_and_sorts_newest_first() {
        let store = SessionStore::new(Arc::new(MemoryBlobStore::new()));
        store.create(session("a", 3)).await.unwrap();
        store.create(session("b", 4)).await.unwrap();
        store.create(session("a", 9)).await.unwrap();

        let sessions = store.list_for_course("a").await.unwrap();
        let days: Vec<_> = sessions.iter().map(|s| s.date.format("%d").to_string()).collect();
        assert_eq!(days, vec!["09", "03"]);
    }

    #[actix_web::test]
    async fn activate_and_deactivate() {
        let store = SessionStore::new(Arc::new(MemoryBlobStore::new()));
        let created = store.create(session("a", 3)).await.unwrap();

        let active = store
            .set_teacher_location(&created.id, Some(GeoPoint::new(1.0, 2.0)))
            .await
            .unwrap()
            .unwrap();
        assert!(active.is_active());
        assert!(store.get(&created.id).await.unwrap().unwrap().is_active());

        let closed = store
            .set_teacher_location(&created.id, None)
            .await
            .unwrap()
            .unwrap();
        assert!(!closed.is_active());

        assert!(
            store
                .set_teacher_location("missing", None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
