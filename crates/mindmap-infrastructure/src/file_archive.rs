//! Flat-file conversation archive.

use async_trait::async_trait;
use mindmap_core::archive::{ArchivedRecord, ConversationArchive};
use mindmap_core::error::{MindmapError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

const CONVERSATIONS_DIR: &str = "conversations";
const OUTLINES_DIR: &str = "mindmaps";

/// Bound on key bumps when several exchanges land in the same millisecond.
const MAX_KEY_ATTEMPTS: i64 = 1000;

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Archive writing each exchange as two timestamped snapshots.
///
/// Directory structure:
/// ```text
/// root/
/// ├── conversations/
/// │   └── 1735689600000.txt
/// └── mindmaps/
///     └── 1735689600000.md
/// ```
///
/// Both directories are created lazily on the first write. The conversation
/// file is opened with `create_new`, and an occupied key is advanced by one
/// millisecond, so exchanges finishing in the same millisecond never
/// overwrite each other.
pub struct FileConversationArchiver {
    root: PathBuf,
    clock: Clock,
}

impl FileConversationArchiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clock: Arc::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Replaces the millisecond clock (for deterministic tests).
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.root.join(CONVERSATIONS_DIR)
    }

    pub fn outlines_dir(&self) -> PathBuf {
        self.root.join(OUTLINES_DIR)
    }

    async fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.conversations_dir(), self.outlines_dir()] {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                MindmapError::storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Claims a free key by creating the conversation file exclusively.
    async fn claim_key(&self, start: i64) -> Result<(i64, tokio::fs::File, PathBuf)> {
        for offset in 0..MAX_KEY_ATTEMPTS {
            let key = start + offset;
            let path = self.conversations_dir().join(format!("{key}.txt"));
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((key, file, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!("[Archive] Key {} taken, advancing", key);
                }
                Err(e) => {
                    return Err(MindmapError::storage(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }
        Err(MindmapError::storage(format!(
            "No free archive key within {MAX_KEY_ATTEMPTS} ms of {start}"
        )))
    }
}

async fn write_all(file: &mut tokio::fs::File, path: &Path, content: &str) -> Result<()> {
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| MindmapError::storage(format!("Failed to write {}: {}", path.display(), e)))?;
    file.flush()
        .await
        .map_err(|e| MindmapError::storage(format!("Failed to flush {}: {}", path.display(), e)))
}

async fn create_exclusive(path: &Path) -> Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| MindmapError::storage(format!("Failed to create {}: {}", path.display(), e)))
}

#[async_trait]
impl ConversationArchive for FileConversationArchiver {
    async fn archive(&self, conversation: &str, outline: &str) -> Result<ArchivedRecord> {
        self.ensure_dirs().await?;

        let (timestamp_id, mut conversation_file, conversation_path) =
            self.claim_key((self.clock)()).await?;
        let outline_path = self.outlines_dir().join(format!("{timestamp_id}.md"));

        let written = async {
            write_all(&mut conversation_file, &conversation_path, conversation).await?;
            let mut outline_file = create_exclusive(&outline_path).await?;
            write_all(&mut outline_file, &outline_path, outline).await?;
            Ok::<_, MindmapError>(())
        }
        .await;
        drop(conversation_file);

        // A half-written exchange releases its key.
        if let Err(err) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&conversation_path).await {
                tracing::warn!(
                    "[Archive] Failed to remove {}: {}",
                    conversation_path.display(),
                    cleanup
                );
            }
            return Err(err);
        }

        tracing::info!(
            "[Archive] Archived exchange {} ({} + {} bytes)",
            timestamp_id,
            conversation.len(),
            outline.len()
        );

        Ok(ArchivedRecord {
            timestamp_id,
            conversation_path,
            outline_path,
        })
    }
}
