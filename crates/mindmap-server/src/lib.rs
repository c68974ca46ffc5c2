//! HTTP API and command-line client for the mindmap chat service.

pub mod app;
pub mod error;
pub mod logging;
pub mod routes;

pub use app::{AppBootstrap, AppState};
pub use error::ApiError;
