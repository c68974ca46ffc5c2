//! Diagram rendering and PNG export over the shared surface.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mindmap_core::error::MindmapError;
use mindmap_core::outline::Outline;
use mindmap_diagram::PNG_CONTENT_TYPE;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/diagram", get(current_diagram).post(render_diagram))
        .route("/api/diagram/export", get(export_diagram))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub outline: String,
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response()
}

async fn render_diagram(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, ApiError> {
    let outline = Outline::from_markdown(request.outline);
    let mut surface = state.surface.write().await;
    let handle = state.renderer.render(&mut surface, &outline)?;
    tracing::info!(
        "[API] Rendered diagram '{}' ({} nodes)",
        handle.root_label,
        handle.node_count
    );

    let svg = surface
        .standalone_svg()
        .ok_or_else(|| MindmapError::render("Surface is empty after rendering"))?;
    Ok(svg_response(svg))
}

async fn current_diagram(State(state): State<AppState>) -> Result<Response, ApiError> {
    let surface = state.surface.read().await;
    surface
        .standalone_svg()
        .map(svg_response)
        .ok_or_else(|| ApiError::not_found("No diagram has been rendered yet"))
}

async fn export_diagram(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = {
        let surface = state.surface.read().await;
        if surface.is_empty() {
            return Err(ApiError::not_found("No diagram has been rendered yet"));
        }
        surface.clone()
    };

    let exporter = state.exporter.clone();
    let image = tokio::task::spawn_blocking(move || exporter.export_raster(&snapshot))
        .await
        .map_err(|e| MindmapError::export(format!("Export task failed: {e}")))??;

    let disposition = format!("attachment; filename=\"{}\"", image.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, PNG_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        image.bytes,
    )
        .into_response())
}

