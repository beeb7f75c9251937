pub(crate) mod error;
pub(crate) mod todo;
pub mod types;
pub(crate) mod validation;

pub(crate) use crate::service::Service;
use axum::{http::StatusCode, Json};
pub(crate) use types::*;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
    tag = "meta"
)]
#[tracing::instrument(name = "index", skip_all)]
pub(crate) async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, Kube Ops!".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "meta"
)]
#[tracing::instrument(name = "healthz", skip_all)]
pub(crate) async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fails on purpose so the error path of the access log can be observed.
#[utoipa::path(
    get,
    path = "/boom",
    responses((status = 500, description = "Always fails", body = ErrorResponse)),
    tag = "meta"
)]
#[tracing::instrument(name = "boom", skip_all)]
pub(crate) async fn boom() -> Json<MessageResponse> {
    panic!("boom: deliberate failure for observability testing");
}

pub(crate) async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
}
