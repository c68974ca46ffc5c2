pub mod chat;
pub mod credential;
pub mod diagram;
pub mod serve;

use anyhow::{Context as _, Result};
use mindmap_core::config::AppConfig;
use mindmap_infrastructure::{ConfigService, MindmapPaths};
use std::path::PathBuf;

/// Environment variable consulted when no credential is stored.
pub const CREDENTIAL_ENV: &str = "DEEPSEEK_API_KEY";

/// Resolved paths and configuration shared by every command.
pub struct Context {
    pub paths: MindmapPaths,
    pub config: AppConfig,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let paths = MindmapPaths::new(None);
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(&paths).context("Failed to locate config file")?,
        };
        let config = service
            .get_config()
            .with_context(|| format!("Failed to load {}", service.path().display()))?;
        Ok(Self { paths, config })
    }
}
