use std::sync::Arc;

use anyhow::{Context, Result};
use mindmap_application::ChatUseCase;
use mindmap_core::config::AppConfig;
use mindmap_core::outline::OutlineExtractor;
use mindmap_infrastructure::FileConversationArchiver;
use mindmap_infrastructure::paths::resolve_archive_root;
use mindmap_interaction::DeepSeekApiAgent;

use crate::app::AppState;

pub struct AppBootstrap {
    pub app_state: AppState,
}

impl AppBootstrap {
    /// Wires the production services from configuration.
    pub fn build(config: &AppConfig) -> Result<Self> {
        let chat = Arc::new(build_chat_usecase(config)?);
        let app_state = AppState::new(chat, &config.render, &config.export);
        Ok(Self { app_state })
    }
}

/// Builds the chat use case against the configured provider and archive.
pub fn build_chat_usecase(config: &AppConfig) -> Result<ChatUseCase> {
    let agent = Arc::new(
        DeepSeekApiAgent::new(&config.upstream).context("Failed to create upstream client")?,
    );
    let archive_root = resolve_archive_root(&config.archive.root);
    tracing::info!(
        "[Bootstrap] Upstream {} (model {}), archive at {}",
        agent.base_url(),
        config.upstream.model,
        archive_root.display()
    );
    let archive = Arc::new(FileConversationArchiver::new(archive_root));

    Ok(
        ChatUseCase::new(agent.clone(), agent, archive)
            .with_extractor(OutlineExtractor::from(&config.outline)),
    )
}
