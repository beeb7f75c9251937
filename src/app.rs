use crate::docs::openapi::ApiDoc;
use crate::middleware::access_log::{access_log, RequestLogger};
use crate::service::Service;
use crate::{
    handlers,
    middleware::{metrics::record_metrics, trace_root::trace_root},
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};

use tower_http::trace::TraceLayer;
use tracing::instrument;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

fn todo_routes() -> OpenApiRouter<Service> {
    OpenApiRouter::new()
        .route("/", get(handlers::todo::get_all).post(handlers::todo::add))
        .route(
            "/{id}",
            get(handlers::todo::get)
                .patch(handlers::todo::update)
                .delete(handlers::todo::delete),
        )
}

/// Routes, per-request tracing and metrics, then the access log around everything,
/// swagger and unmatched paths included.
#[instrument(name = "build_app", skip_all)]
pub fn build_app(service: Service, logger: RequestLogger) -> Router {
    let app_router = OpenApiRouter::new()
        .nest("/api/todos", todo_routes())
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/boom", get(handlers::boom))
        .layer(from_fn(record_metrics))
        .layer(from_fn(trace_root))
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(app_router)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(logger, access_log))
}
