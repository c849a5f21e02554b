use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Place search error: {0}")]
    PlaceSearch(String),

    #[error("Ranking assist error: {0}")]
    RankingAssist(String),

    #[error("Could not parse ranking assist reply: {0}")]
    AssistParse(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::PlaceSearch(ref e) => {
                tracing::error!("Place search error: {}", e);
                (StatusCode::BAD_GATEWAY, "Place search service error")
            }
            AppError::RankingAssist(ref e) | AppError::AssistParse(ref e) => {
                tracing::error!("Ranking assist error: {}", e);
                (StatusCode::BAD_GATEWAY, "Ranking service error")
            }
            AppError::ProviderUnavailable(ref e) => {
                tracing::warn!("Provider unavailable: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Upstream provider unavailable")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.as_str()),
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
