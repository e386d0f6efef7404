//! Data Transfer Objects (DTOs) for the game backend.
//!
//! - `http`: REST request and response bodies
//! - `conversion`: DTO → domain entity conversions

pub mod conversion;
pub mod http;
