//! Unified path management for mindmap configuration and data files.

use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory.
const APP_DIR: &str = "mindmap-chat";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for the mindmap service.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/mindmap-chat/      # Config directory (or the --base override)
/// ├── config.toml              # Application configuration
/// ├── credential.json          # Client-held bearer credential (CLI only)
/// └── logs/                    # Application logs
///     └── mindmap.log.YYYY-MM-DD
///
/// <archive root>/              # `archive.root`, default ./data
/// ├── conversations/<ts>.txt
/// └── mindmaps/<ts>.md
/// ```
#[derive(Debug, Clone, Default)]
pub struct MindmapPaths {
    base: Option<PathBuf>,
}

impl MindmapPaths {
    /// Creates a path resolver. `Some(base)` replaces the platform config
    /// directory (used by tests and `--config-dir`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the credential file.
    ///
    /// # Security Note
    ///
    /// The file is written with mode 600 on Unix.
    pub fn credential_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("credential.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

/// Resolves the archive root from configuration. Relative roots are
/// anchored at the current working directory.
pub fn resolve_archive_root(root: &str) -> PathBuf {
    let path = PathBuf::from(root);
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        let paths = MindmapPaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }

    #[test]
    fn test_files_live_under_base() {
        let base = PathBuf::from("/tmp/mindmap-test-base");
        let paths = MindmapPaths::new(Some(&base));

        assert_eq!(paths.config_file().unwrap(), base.join("config.toml"));
        assert_eq!(paths.credential_file().unwrap(), base.join("credential.json"));
        assert_eq!(paths.logs_dir().unwrap(), base.join("logs"));
    }

    #[test]
    fn test_resolve_archive_root() {
        assert_eq!(resolve_archive_root("/srv/data"), PathBuf::from("/srv/data"));
        assert!(resolve_archive_root("data").ends_with("data"));
    }
}
