use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "9b2d7e0c-4d2c-4c1f-8a5e-1f0c7b3a2e44",
        "courseId": "c1",
        "date": "2025-01-10",
        "startTime": "09:00",
        "checkinTimeLimit": 10,
        "teacherLocation": { "latitude": 23.7808, "longitude": 90.2792 }
    })
)]
pub struct Session {
    pub id: String,
    pub course_id: String,
    #[schema(example = "2025-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(default, with = "clock_time", skip_serializing_if = "Option::is_none")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    /// Grace period in minutes. Absent or negative disables the lateness check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_time_limit: Option<i64>,
    /// Set while check-in is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_location: Option<GeoPoint>,
}

impl Session {
    pub fn new(
        course_id: String,
        date: NaiveDate,
        start_time: Option<NaiveTime>,
        checkin_time_limit: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id,
            date,
            start_time,
            checkin_time_limit,
            teacher_location: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.teacher_location.is_some()
    }

    pub fn checkin_path(&self) -> String {
        format!("/checkin/{}/{}", self.course_id, self.id)
    }
}

/// `HH:MM` on the wire; `HH:MM:SS` is accepted on input.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time {s:?}, expected HH:MM"))),
        }
    }
}
