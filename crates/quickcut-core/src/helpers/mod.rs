pub mod geometry;
pub mod log;
pub mod time;
