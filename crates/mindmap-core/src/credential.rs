//! Bearer credential and its client-side storage capability.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Opaque bearer token authorizing calls to the upstream provider.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw token, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Client-side persistence of the credential.
///
/// The server never persists credentials; this capability is used by the
/// client (the CLI) to remember the token between sessions.
///
/// # Security Note
///
/// Implementations must never log the token or put it in error messages.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads the stored credential, `Ok(None)` when nothing is stored.
    async fn load_credential(&self) -> Result<Option<Credential>>;

    /// Persists the credential, replacing any previous one.
    async fn save_credential(&self, credential: &Credential) -> Result<()>;

    /// Removes the stored credential (no-op when absent).
    async fn clear_credential(&self) -> Result<()>;
}
