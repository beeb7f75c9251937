use super::error::AppError;
use super::types::*;
use super::validation::{json_payload, validate_create, validate_update};
use crate::{handlers::Service, storage::Todo, utils::RootSpan};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "All todos, newest first", body = Vec<Todo>),
    ),
    tag = "todos"
)]
#[tracing::instrument(name = "handlers::todo::get_all", skip_all)]
pub(crate) async fn get_all(
    State(service): State<Service>,
    Extension(root_span): Extension<RootSpan>,
) -> Result<impl IntoResponse, AppError> {
    let todos = service.todo().list().await?;

    root_span.record().todo_count(todos.len());
    info!("Get {} ToDos", todos.len());

    Ok(Json(todos))
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(
        ("id" = u64, Path, description = "ToDo ID")
    ),
    responses(
        (status = 200, description = "Get ToDo by ID", body = Todo),
        (status = 404, description = "ToDo not found", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[tracing::instrument(name = "handlers::todo::get", skip_all)]
pub(crate) async fn get(
    State(service): State<Service>,
    Extension(root_span): Extension<RootSpan>,
    TodoIdPath(id): TodoIdPath,
) -> Result<impl IntoResponse, AppError> {
    root_span.record().todo_id(&id);

    let todo = service.todo().get(id).await?;

    tracing::info!(todo = ?todo, "Get ToDo");

    Ok(Json(todo))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    request_body(
        content = CreateTodo,
        description = "New ToDo item",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "ToDo created", body = Todo),
        (status = 400, description = "Invalid fields", body = ValidationErrorResponse),
    ),
    tag = "todos"
)]
#[tracing::instrument(name = "handlers::todo::post", skip_all)]
pub(crate) async fn add(
    State(service): State<Service>,
    Extension(root_span): Extension<RootSpan>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let new = validate_create(json_payload(&headers, &body))?;

    match service.todo().add(new).await {
        Ok(todo) => {
            root_span.record().todo_id(&todo.id);
            Ok((StatusCode::CREATED, Json(todo)))
        }
        Err(e) => {
            tracing::error!(err = ?e, "failed to add new ToDo");
            Err(e)
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    params(
        ("id" = u64, Path, description = "ToDo ID")
    ),
    request_body(
        content = UpdateTodo,
        description = "Partial ToDo update; an empty object changes nothing",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "ToDo updated", body = Todo),
        (status = 400, description = "Invalid fields", body = ValidationErrorResponse),
        (status = 404, description = "ToDo not found", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[tracing::instrument(name = "handlers::todo::update", skip_all)]
pub(crate) async fn update(
    State(service): State<Service>,
    Extension(root_span): Extension<RootSpan>,
    TodoIdPath(id): TodoIdPath,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    root_span.record().todo_id(&id);

    service.todo().get(id).await?;

    let patch = validate_update(json_payload(&headers, &body))?;
    let todo = service.todo().update(id, patch).await?;

    Ok(Json(todo))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(
        ("id" = u64, Path, description = "ToDo ID")
    ),
    responses(
        (status = 204, description = "ToDo deleted"),
        (status = 404, description = "ToDo not found", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[tracing::instrument(name = "handlers::todo::delete", skip_all)]
pub(crate) async fn delete(
    State(service): State<Service>,
    Extension(root_span): Extension<RootSpan>,
    TodoIdPath(id): TodoIdPath,
) -> Result<impl IntoResponse, AppError> {
    root_span.record().todo_id(&id);

    service.todo().get(id).await?;
    service.todo().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
