//! HTTP mapping of domain errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mindmap_core::error::MindmapError;
use serde_json::json;

/// Shown when the provider rejects the credential.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "无效的API Key，请提供有效的API Key";
/// Shown for upstream and internal failures; details only go to the log.
pub const PROCESSING_ERROR_MESSAGE: &str = "处理请求时发生错误";
/// Shown when no credential was supplied at all.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "请输入API Key";

/// Error returned by route handlers, rendered as `{ "error": message }`.
#[derive(Debug)]
pub enum ApiError {
    Domain(MindmapError),
    NotFound(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Domain(err) => match err {
                MindmapError::InvalidCredential => StatusCode::UNAUTHORIZED,
                MindmapError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                MindmapError::RenderFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MindmapError::ExportBusy => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound(message) => message.clone(),
            Self::Domain(err) => match err {
                MindmapError::InvalidCredential => INVALID_CREDENTIAL_MESSAGE.to_string(),
                MindmapError::InvalidInput(message) => message.clone(),
                MindmapError::RenderFailure(_)
                | MindmapError::ExportFailure(_)
                | MindmapError::ExportBusy => err.to_string(),
                _ => PROCESSING_ERROR_MESSAGE.to_string(),
            },
        }
    }
}

impl From<MindmapError> for ApiError {
    fn from(err: MindmapError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Domain(err) = &self {
            if status.is_server_error() {
                tracing::error!("[API] Request failed: {}", err);
            } else {
                tracing::warn!("[API] Request rejected: {}", err);
            }
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MindmapError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (MindmapError::invalid_input("empty"), StatusCode::BAD_REQUEST),
            (MindmapError::upstream_status(503, "x"), StatusCode::INTERNAL_SERVER_ERROR),
            (MindmapError::malformed("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (MindmapError::render("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (MindmapError::export("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (MindmapError::ExportBusy, StatusCode::CONFLICT),
            (MindmapError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(ApiError::not_found("none").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_detail_is_not_exposed() {
        let err = ApiError::from(MindmapError::upstream_status(402, "Insufficient Balance"));
        assert_eq!(err.message(), PROCESSING_ERROR_MESSAGE);
        assert_eq!(
            ApiError::from(MindmapError::InvalidCredential).message(),
            INVALID_CREDENTIAL_MESSAGE
        );
    }
}
