//! Foundation utilities shared by every panel subsystem

pub mod math;
pub mod time;
