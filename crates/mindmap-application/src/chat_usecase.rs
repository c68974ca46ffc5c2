//! Chat use case: one user message through validation, completion,
//! outline extraction and archiving.

use mindmap_core::archive::{ArchivedRecord, ConversationArchive};
use mindmap_core::conversation::exchange_text;
use mindmap_core::credential::Credential;
use mindmap_core::error::{MindmapError, Result};
use mindmap_core::outline::{Outline, OutlineExtractor};
use mindmap_core::upstream::{CompletionGateway, CredentialValidator};
use serde::Serialize;
use std::sync::Arc;

/// Result of one successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    /// The model's raw completion text.
    pub response: String,
    pub outline: Outline,
    /// `None` when archiving failed; the reply is returned regardless.
    #[serde(skip)]
    pub archived: Option<ArchivedRecord>,
}

/// Coordinates the upstream provider, the outline extractor and the archive.
///
/// Steps run strictly in order: validate, complete, extract, archive. A
/// rejected credential stops the exchange before any completion call.
pub struct ChatUseCase {
    validator: Arc<dyn CredentialValidator>,
    gateway: Arc<dyn CompletionGateway>,
    archive: Arc<dyn ConversationArchive>,
    extractor: OutlineExtractor,
}

impl ChatUseCase {
    pub fn new(
        validator: Arc<dyn CredentialValidator>,
        gateway: Arc<dyn CompletionGateway>,
        archive: Arc<dyn ConversationArchive>,
    ) -> Self {
        Self {
            validator,
            gateway,
            archive,
            extractor: OutlineExtractor::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: OutlineExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Checks a credential with the provider.
    pub async fn validate_credential(&self, credential: &Credential) -> bool {
        let valid = self.validator.validate(credential).await;
        tracing::debug!("[ChatUseCase] Credential validation result: {}", valid);
        valid
    }

    /// Runs one exchange.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty message
    /// - `InvalidCredential` when the provider rejects the credential
    /// - `UpstreamUnavailable` / `MalformedUpstreamResponse` from the completion call
    ///
    /// Archive failures are logged and never returned.
    pub async fn chat(&self, message: &str, credential: &Credential) -> Result<ChatReply> {
        if message.trim().is_empty() {
            return Err(MindmapError::invalid_input("Message must not be empty"));
        }

        if !self.validate_credential(credential).await {
            tracing::warn!("[ChatUseCase] Rejected exchange: invalid credential");
            return Err(MindmapError::InvalidCredential);
        }

        let response = self.gateway.complete(message, credential).await?;
        let outline = self.extractor.extract(&response);
        tracing::info!(
            "[ChatUseCase] Completion received ({} chars, outline {:?})",
            response.chars().count(),
            outline.source()
        );

        let archived = match self
            .archive
            .archive(&exchange_text(message, &response), outline.as_str())
            .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("[ChatUseCase] Failed to archive exchange: {}", e);
                None
            }
        };

        Ok(ChatReply {
            response,
            outline,
            archived,
        })
    }
}
