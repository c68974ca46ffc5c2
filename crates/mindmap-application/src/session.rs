//! Client-side chat session.

use crate::chat_usecase::{ChatReply, ChatUseCase};
use mindmap_core::conversation::ConversationTurn;
use mindmap_core::credential::Credential;
use mindmap_core::error::{MindmapError, Result};
use mindmap_core::outline::Outline;
use std::sync::Arc;

/// Shown in place of a reply when an exchange fails.
pub const FAILED_REPLY_NOTICE: &str = "抱歉，处理您的请求时发生错误。";

/// In-memory conversation held by one client.
///
/// Turns live only as long as the session; the archive is the sole durable
/// record of an exchange.
pub struct ChatSession {
    usecase: Arc<ChatUseCase>,
    credential: Credential,
    turns: Vec<ConversationTurn>,
    latest_outline: Option<Outline>,
}

impl ChatSession {
    /// Opens a session after confirming the credential with the provider.
    pub async fn start(usecase: Arc<ChatUseCase>, credential: Credential) -> Result<Self> {
        if !usecase.validate_credential(&credential).await {
            return Err(MindmapError::InvalidCredential);
        }
        Ok(Self {
            usecase,
            credential,
            turns: Vec::new(),
            latest_outline: None,
        })
    }

    /// Sends one message.
    ///
    /// The user turn is always recorded. On failure a notice turn stands in
    /// for the reply and the error is returned to the caller.
    pub async fn send(&mut self, message: &str) -> Result<ChatReply> {
        if message.trim().is_empty() {
            return Err(MindmapError::invalid_input("Message must not be empty"));
        }

        self.turns.push(ConversationTurn::user(message));
        match self.usecase.chat(message, &self.credential).await {
            Ok(reply) => {
                self.turns.push(ConversationTurn::assistant(reply.response.clone()));
                self.latest_outline = Some(reply.outline.clone());
                Ok(reply)
            }
            Err(e) => {
                self.turns.push(ConversationTurn::assistant(FAILED_REPLY_NOTICE));
                Err(e)
            }
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn latest_outline(&self) -> Option<&Outline> {
        self.latest_outline.as_ref()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
