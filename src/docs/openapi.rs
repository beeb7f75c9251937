use utoipa::OpenApi;

use crate::handlers::types::{
    CreateTodo, ErrorResponse, HealthResponse, MessageResponse, UpdateTodo,
    ValidationErrorResponse,
};
use crate::storage::Todo;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::index,
        crate::handlers::healthz,
        crate::handlers::boom,
        crate::handlers::todo::get_all,
        crate::handlers::todo::get,
        crate::handlers::todo::add,
        crate::handlers::todo::update,
        crate::handlers::todo::delete,
    ),
    components(
        schemas(
            Todo,
            CreateTodo,
            UpdateTodo,
            ErrorResponse,
            ValidationErrorResponse,
            MessageResponse,
            HealthResponse
        ),
    ),
    tags(
        (name = "todos", description = "Endpoints to create and manage todo items"),
        (name = "meta", description = "Greeting, liveness check and failure demo")
    ),
    info(
        title = "Kube Ops Todo API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
