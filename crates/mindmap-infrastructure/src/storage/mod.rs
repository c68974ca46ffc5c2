//! Storage layer for client-held files.

mod credential_storage;

pub use credential_storage::{FileCredentialStore, InMemoryCredentialStore};
