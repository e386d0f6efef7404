//! Terminal player and admin clients for Number Hunt.
//!
//! All game state lives on the backend. The clients poll it, derive the
//! local phase from what they see, and dispatch user actions as single
//! REST calls.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
