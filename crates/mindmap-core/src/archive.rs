//! Conversation archive contract.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Informational result of archiving one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedRecord {
    /// Epoch milliseconds, shared by both files of the exchange.
    pub timestamp_id: i64,
    pub conversation_path: PathBuf,
    pub outline_path: PathBuf,
}

/// Durable, append-only record of exchanges and their derived outlines.
///
/// Every call produces two new snapshots; nothing is deduplicated, rotated,
/// updated or deleted.
#[async_trait::async_trait]
pub trait ConversationArchive: Send + Sync {
    /// Writes the raw conversation text and the outline text of one exchange.
    ///
    /// # Errors
    ///
    /// `StorageWriteFailure` when a directory or file cannot be written.
    async fn archive(&self, conversation: &str, outline: &str) -> Result<ArchivedRecord>;
}
