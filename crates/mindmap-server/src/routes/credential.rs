//! `POST /api/credential/validate`: checks a key before a client stores it.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use mindmap_core::credential::Credential;
use mindmap_core::error::MindmapError;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::{ApiError, MISSING_CREDENTIAL_MESSAGE};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/credential/validate", post(validate))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default, alias = "apiKey")]
    pub credential: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let credential = Credential::new(request.credential);
    if credential.is_empty() {
        return Err(MindmapError::invalid_input(MISSING_CREDENTIAL_MESSAGE).into());
    }

    let valid = state.chat.validate_credential(&credential).await;
    Ok(Json(ValidateResponse { valid }))
}
