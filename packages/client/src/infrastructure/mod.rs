//! Infrastructure layer.
//!
//! Concrete implementations of the domain traits: the reqwest REST client,
//! its DTOs, and the token stores.

pub mod dto;
pub mod http_client;
pub mod token_store;

pub use http_client::RestClient;
pub use token_store::{FileTokenStore, InMemoryTokenStore};
