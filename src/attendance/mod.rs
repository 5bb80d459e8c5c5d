//! Check-in validation and the attendance records it writes.

pub mod analytics;
pub mod evaluator;
pub mod lateness;
pub mod proximity;
pub mod roster;
pub mod store;

pub use evaluator::{CheckInError, CheckInEvaluator, Clock, LocalClock, LocationSource};
pub use roster::RosterLookup;
pub use store::AttendanceStore;
