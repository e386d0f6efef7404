//! Utilities shared by the Number Hunt client binaries.

pub mod logger;
pub mod time;
