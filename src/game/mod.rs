pub mod field;
pub mod judge;
pub mod note;
pub mod pitch;
pub mod scoring;
pub mod session;
pub mod staff;
