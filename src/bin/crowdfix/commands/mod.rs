pub mod analyze;
pub mod bugs;
pub mod dashboard;
pub mod matches;
pub mod server;
pub mod verify;
