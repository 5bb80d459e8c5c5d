use futures::lock::Mutex;
use std::sync::Arc;

use crate::model::attendance::{AttendanceBook, AttendanceRecord, SessionAttendance};
use crate::store::{BlobStore, StoreError, load_json, save_json};

/// Stable key of the serialized attendance book.
pub const ATTENDANCE_KEY: &str = "attendanceRecords";

/// The whole attendance book is one blob: every write loads it, mutates it
/// and saves it back. `write_lock` serializes that sequence inside this
/// process only; a second process sharing the backend can still interleave
/// and the last save wins.
#[derive(Clone)]
pub struct AttendanceStore {
    blob: Arc<dyn BlobStore>,
    write_lock: Arc<Mutex<()>>,
}

impl AttendanceStore {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load(&self) -> Result<AttendanceBook, StoreError> {
        load_json(self.blob.as_ref(), ATTENDANCE_KEY).await
    }

    pub async fn save(&self, book: &AttendanceBook) -> Result<(), StoreError> {
        save_json(self.blob.as_ref(), ATTENDANCE_KEY, book).await
    }

    pub async fn session_records(&self, session_id: &str) -> Result<SessionAttendance, StoreError> {
        Ok(self.load().await?.remove(session_id).unwrap_or_default())
    }

    /// Writes a record, replacing any earlier one for the same student.
    /// Returns the replaced record.
    pub async fn put(
        &self,
        session_id: &str,
        student_id: &str,
        record: AttendanceRecord,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut book = self.load().await?;
        let previous = book
            .entry(session_id.to_string())
            .or_default()
            .insert(student_id.to_string(), record);
        self.save(&book).await?;

        Ok(previous)
    }
}
