//! Poet HTTP API
//!
//! Axum service exposing the uploads resource on top of `poet-storage`.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod rest;
pub mod setup;
pub mod state;
pub mod utils;

pub use repository::{InMemoryUploadRepository, UploadRepository};
pub use state::AppState;
