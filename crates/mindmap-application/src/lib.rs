//! Application layer for the mindmap service.
//!
//! Use cases coordinating the upstream provider, outline extraction and the
//! conversation archive.

pub mod chat_usecase;
pub mod session;

pub use chat_usecase::{ChatReply, ChatUseCase};
pub use session::{ChatSession, FAILED_REPLY_NOTICE};
