//! `POST /api/chat`: one exchange with the provider.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use mindmap_core::credential::Credential;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "apiKey")]
    pub credential: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub outline: String,
    /// `false` when the outline is the raw reply.
    pub derived: bool,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let credential = Credential::new(request.credential);
    let reply = state.chat.chat(&request.message, &credential).await?;

    // The shared surface follows the latest reply; a render failure only
    // costs the drawing.
    {
        let mut surface = state.surface.write().await;
        if let Err(e) = state.renderer.render(&mut surface, &reply.outline) {
            tracing::warn!("[API] Failed to render reply outline: {}", e);
        }
    }

    Ok(Json(ChatResponse {
        derived: reply.outline.is_derived(),
        outline: reply.outline.into_string(),
        response: reply.response,
    }))
}
