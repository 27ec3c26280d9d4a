use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dice::DiceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Dice error: {0}")]
    Dice(#[from] DiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dice(e @ DiceError::InvariantViolation { .. }) => {
                tracing::error!("Pool invariant violated: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal dice pool error occurred".to_string())
            }
            AppError::Dice(e) => {
                tracing::warn!("Invalid dice notation: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
