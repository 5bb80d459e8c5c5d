pub mod attendance;
pub mod course;
pub mod geo;
pub mod session;
pub mod student;
