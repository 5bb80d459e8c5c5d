use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Late,
}

/// Status as shown on the dashboard, where a missing record means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum RosterStatus {
    Present,
    Late,
    Absent,
}

impl From<AttendanceStatus> for RosterStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => RosterStatus::Present,
            AttendanceStatus::Late => RosterStatus::Late,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "status": "Present", "time": "9:04:12 AM" }))]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    /// Localized clock time of the check-in.
    pub time: String,
}

/// studentId -> record
pub type SessionAttendance = HashMap<String, AttendanceRecord>;

/// sessionId -> studentId -> record
pub type AttendanceBook = HashMap<String, SessionAttendance>;
