//! Credential file storage.
//!
//! Keeps the client-held bearer credential in `credential.json` under the
//! config directory.

use crate::paths::MindmapPaths;
use async_trait::async_trait;
use mindmap_core::credential::{Credential, CredentialStore};
use mindmap_core::error::{MindmapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

#[derive(Serialize, Deserialize, Default)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Storage for the credential file (credential.json).
///
/// Responsibilities:
/// - Load and save the token as JSON
/// - Restrict the file to the owner (600) on Unix
///
/// Does NOT:
/// - Validate the token (see `CredentialValidator`)
/// - Encrypt anything (plaintext JSON storage)
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store at the default location.
    pub fn new(paths: &MindmapPaths) -> Result<Self> {
        let path = paths
            .credential_file()
            .map_err(|e| MindmapError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a store with a custom path (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file for rewriting, owner-only before any byte is written.
    /// A file left by an older save keeps its mode on open, so it is
    /// tightened explicitly as well.
    async fn open_restricted(&self) -> Result<tokio::fs::File> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let file = options.open(&self.path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        Ok(file)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load_credential(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let file: CredentialFile = serde_json::from_str(&content)?;
        Ok(file
            .api_key
            .map(Credential::new)
            .filter(|credential| !credential.is_empty()))
    }

    async fn save_credential(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = CredentialFile {
            api_key: Some(credential.expose().to_string()),
        };
        let content = serde_json::to_string_pretty(&file)?;
        let mut handle = self.open_restricted().await?;
        handle.write_all(content.as_bytes()).await?;
        handle.flush().await?;

        tracing::info!("[CredentialStore] Saved credential to {:?}", self.path);
        Ok(())
    }

    async fn clear_credential(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local credential store for tests and one-shot sessions.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load_credential(&self) -> Result<Option<Credential>> {
        Ok(self.credential.read().await.clone())
    }

    async fn save_credential(&self, credential: &Credential) -> Result<()> {
        *self.credential.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear_credential(&self) -> Result<()> {
        *self.credential.write().await = None;
        Ok(())
    }
}
