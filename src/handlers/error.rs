use crate::{handlers::validation::ValidationErrors, storage::StorageError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use strum_macros::AsRefStr;
use thiserror::Error;

pub(crate) const INTERNAL_SERVER_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Error, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Internal storage error")]
    InternalStorage(#[source] StorageError),

    #[error("Failed joining tokio task")]
    JoinTask(#[from] tokio::task::JoinError),
}

/// Failure detail for the access log. Attached to 500 responses, never serialised to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InternalErrorMessage(pub String);

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound => Self::NotFound,
            _ => Self::InternalStorage(value),
        }
    }
}

impl AppError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InternalStorage { .. } | AppError::JoinTask { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// `Display` of the error followed by every `source()` in the chain.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(crate) fn internal_error_response(message: String) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_SERVER_ERROR_MESSAGE })),
    )
        .into_response();
    response
        .extensions_mut()
        .insert(InternalErrorMessage(message));
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::NotFound => {
                tracing::warn!("AppError: not found");
                (status, Json(json!({ "error": "not found" }))).into_response()
            }
            AppError::Validation(errors) => {
                tracing::info!(errors = ?errors, "AppError: validation failed");
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            internal => {
                tracing::error!(error = ?internal, error_kind = %internal.as_ref(), "AppError");
                internal_error_response(error_chain(&internal))
            }
        }
    }
}
