use chrono::{Duration, NaiveDateTime};

use crate::model::{attendance::AttendanceStatus, session::Session};

/// `date + startTime + checkinTimeLimit`, or `None` when no limit applies.
pub fn deadline(session: &Session) -> Option<NaiveDateTime> {
    let start = session.start_time?;
    let grace = session.checkin_time_limit.filter(|m| *m >= 0)?;
    session
        .date
        .and_time(start)
        .checked_add_signed(Duration::try_minutes(grace)?)
}

/// Checking in at the deadline itself is still on time.
pub fn classify(session: &Session, at: NaiveDateTime) -> AttendanceStatus {
    match deadline(session) {
        Some(deadline) if at > deadline => AttendanceStatus::Late,
        _ => AttendanceStatus::Present,
    }
}
