use std::sync::Arc;

use mindmap_application::ChatUseCase;
use mindmap_core::config::{ExportConfig, RenderConfig};
use mindmap_diagram::{DiagramExporter, DiagramRenderer, DiagramSurface};
use tokio::sync::RwLock;

/// State shared by every route handler.
///
/// The surface is the only mutable piece: each render replaces it whole, and
/// exports work on a snapshot so a render never waits for rasterization.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatUseCase>,
    pub renderer: Arc<DiagramRenderer>,
    pub surface: Arc<RwLock<DiagramSurface>>,
    pub exporter: Arc<DiagramExporter>,
}

impl AppState {
    pub fn new(chat: Arc<ChatUseCase>, render: &RenderConfig, export: &ExportConfig) -> Self {
        Self {
            chat,
            renderer: Arc::new(DiagramRenderer::from_config(render)),
            surface: Arc::new(RwLock::new(DiagramSurface::from_config(render))),
            exporter: Arc::new(DiagramExporter::new(export.clone())),
        }
    }
}
