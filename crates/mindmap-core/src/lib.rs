//! Domain types and service contracts for the mindmap chat service.

pub mod archive;
pub mod config;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod outline;
pub mod upstream;

// Re-export common error type
pub use error::{MindmapError, Result};
