use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("No data available: {0}")]
    DataUnavailable(String),

    /// The rating matrix cannot support a neighbor model (no ratings,
    /// or no non-zero row). The recommendation engine recovers from
    /// this internally via the popularity fallback; it never reaches
    /// a client as a hard failure.
    #[error("Neighbor model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnknownEntity(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DataUnavailable(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(_) | AppError::Internal(_) | AppError::ModelUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
