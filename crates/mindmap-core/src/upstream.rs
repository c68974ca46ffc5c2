//! Upstream inference provider contracts.

use crate::credential::Credential;
use crate::error::Result;

/// Checks a bearer credential against the upstream provider.
///
/// Binary accept/reject: transport failures, non-2xx answers and malformed
/// responses all count as invalid. A single attempt, no retries.
#[async_trait::async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Returns `true` only when the provider accepted the credential.
    ///
    /// Implementations must return `false` for an empty credential without
    /// touching the network.
    async fn validate(&self, credential: &Credential) -> bool;
}

/// Forwards one user message (plus the fixed system instruction) upstream.
#[async_trait::async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Performs a single blocking round trip and returns the raw completion text.
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable`: transport failure or non-2xx status
    /// - `MalformedUpstreamResponse`: the payload lacks the completion field
    async fn complete(&self, message: &str, credential: &Credential) -> Result<String>;
}
