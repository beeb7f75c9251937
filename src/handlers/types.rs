use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

use super::{error::AppError, validation::ValidationErrors};
use crate::storage::TodoId;

/// Documentation shape of a create body; the live request is validated by hand.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateTodo {
    pub title: String,
    pub done: Option<bool>,
}

/// Documentation shape of a partial update body.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateTodo {
    pub title: Option<String>,
    pub done: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ValidationErrorResponse {
    pub errors: ValidationErrors,
}

/// `{id}` path segment. Anything that is not a non-negative integer cannot name a
/// todo, so it is rejected as not found rather than as a bad request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TodoIdPath(pub TodoId);

impl<S> FromRequestParts<S> for TodoIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    #[instrument(name = "construct_todo_id_from_parts", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                warn!(error = ?e, "Failed to read todo id from path");
                AppError::NotFound
            })?;

        raw.parse::<TodoId>().map(TodoIdPath).map_err(|e| {
            warn!(error = %e, raw_id = %raw, "Todo id is not an integer");
            AppError::NotFound
        })
    }
}
