use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Roster entry. Created with its course, never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Student {
    #[schema(example = "3f1c0c9e-7a0a-4f5e-9d8e-2b6f1d0a9c11")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
