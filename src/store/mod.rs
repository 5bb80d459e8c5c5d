//! Key/value blob persistence. Every collection (courses, sessions,
//! attendance) lives in one serialized JSON document under a stable key.

use async_trait::async_trait;
use derive_more::Display;
use serde::{Serialize, de::DeserializeOwned};

pub mod course;
pub mod memory;
pub mod mysql;
pub mod session;

pub use course::CourseStore;
pub use memory::MemoryBlobStore;
pub use mysql::MySqlBlobStore;
pub use session::SessionStore;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "storage backend failed: {}", _0)]
    Backend(String),
    #[display(fmt = "stored value under {} is unreadable: {}", key, reason)]
    Corrupt { key: String, reason: String },
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn save(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Reads `key` as JSON; a missing key yields `T::default()`.
pub async fn load_json<T>(blob: &dyn BlobStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match blob.load(key).await? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(T::default()),
    }
}

pub async fn save_json<T>(blob: &dyn BlobStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    blob.save(key, raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[actix_web::test]
    async fn missing_key_loads_default() {
        let blob = MemoryBlobStore::new();
        let value: HashMap<String, u32> = load_json(&blob, "nothing").await.unwrap();
        assert!(value.is_empty());
    }

    #[actix_web::test]
    async fn corrupt_blob_is_reported_with_its_key() {
        let blob = MemoryBlobStore::new();
        blob.save("broken", "{not json".to_string()).await.unwrap();

        let err = load_json::<HashMap<String, u32>>(&blob, "broken")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "broken"));
    }
}
