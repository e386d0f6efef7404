//! Terminal UI layer.
//!
//! Command parsing, the two controllers, the rendering seam and the event
//! loops that drive them.

pub mod admin_controller;
pub mod command;
pub mod config;
pub mod controller;
pub mod formatter;
pub mod render;
pub mod router;
pub mod runner;
pub mod terminal;

pub use admin_controller::{AdminController, OverviewRefresh};
pub use config::ClientConfig;
pub use controller::{Flow, GameController};
pub use render::{RecordingRenderer, Renderer};
pub use router::{LoadTicket, ViewRouter};
pub use runner::{run_admin_client, run_player_client};
