pub mod config_service;
pub mod file_archive;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_archive::FileConversationArchiver;
pub use crate::paths::MindmapPaths;
pub use crate::storage::{FileCredentialStore, InMemoryCredentialStore};
