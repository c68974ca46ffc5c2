//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml`, writing a file
//! with the defaults when none exists yet.

use crate::paths::MindmapPaths;
use mindmap_core::config::AppConfig;
use mindmap_core::error::{MindmapError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the default config file location.
    pub fn new(paths: &MindmapPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| MindmapError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading an explicit file (e.g. `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<AppConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_or_create()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_or_create(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, toml::to_string_pretty(&config)?)?;
            tracing::info!("[ConfigService] Wrote default config to {:?}", self.path);
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", self.path);
        Ok(config)
    }
}
