use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodgram_cart::CartError;
use foodgram_shared::Error as CommandError;
use serde_json::json;
use thiserror::Error;

/// Error type returned by every route handler. Command and cart errors
/// carry their own classification, so the response mapping lives in one
/// place.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        AppError::Command(CommandError::NotFound(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Command(CommandError::Validate(errors)) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::Command(CommandError::Conflict(message)) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": message }))).into_response()
            }
            AppError::Command(CommandError::NotFound(message)) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            AppError::Command(CommandError::Forbidden) => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "detail": "You do not have permission to perform this action"
                })),
            )
                .into_response(),
            AppError::Cart(CartError::Empty) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": CartError::Empty.to_string() })),
            )
                .into_response(),
            AppError::Command(CommandError::Server(message)) => {
                tracing::error!("{message}");
                server_error()
            }
            AppError::Command(CommandError::Unknown(error)) => {
                tracing::error!("{error:?}");
                server_error()
            }
            AppError::Cart(CartError::Store(error)) => {
                tracing::error!("{error:?}");
                server_error()
            }
            AppError::Unexpected(error) => {
                tracing::error!("{error:?}");
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
        .into_response()
}
