use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::student::Student;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "c1",
        "name": "Distributed Systems",
        "description": "Tuesday lab group",
        "students": [
            { "id": "s1", "name": "Ada Lovelace" },
            { "id": "s2", "name": "Alan Turing" }
        ]
    })
)]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Course {
    pub fn new(name: String, description: Option<String>, students: Vec<Student>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            students,
        }
    }
}
