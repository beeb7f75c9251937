use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    handlers::error::AppError,
    storage::{NewTodo, Todo, TodoId, TodoPatch, TodoStorage},
    utils::measure_metrics::measure_and_record_service,
};

pub struct ServiceTodoRef {
    storage: Arc<dyn TodoStorage>,
}

impl ServiceTodoRef {
    pub(crate) fn new(storage: Arc<dyn TodoStorage>) -> Self {
        Self { storage }
    }

    #[instrument(name = "Service::todo::add", skip_all, fields(done = new.done))]
    pub async fn add(&self, new: NewTodo) -> Result<Todo, AppError> {
        let todo = measure_and_record_service("add_todo", || async {
            self.storage.create(new).await
        })
        .await?;

        info!(todo_id = %todo.id, "added todo");

        Ok(todo)
    }

    #[instrument(name = "Service::todo::get", skip_all)]
    pub async fn get(&self, todo_id: TodoId) -> Result<Todo, AppError> {
        measure_and_record_service("get_todo", || async { self.storage.get(todo_id).await })
            .await
            .map_err(Into::into)
    }

    #[instrument(name = "Service::todo::list", skip_all)]
    pub async fn list(&self) -> Result<Vec<Todo>, AppError> {
        measure_and_record_service("list_todos", || async { self.storage.list().await })
            .await
            .map_err(Into::into)
    }

    #[instrument(
        name = "Service::todo::update",
        skip_all,
        fields(title_is_some = patch.title.is_some(),
        done_is_some = patch.done.is_some()))
    ]
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, AppError> {
        info!(todo_id = %id, empty_patch = patch.is_empty(), "update todo");

        measure_and_record_service("update_todo", || async {
            self.storage.update(id, patch).await
        })
        .await
        .map_err(Into::into)
    }

    #[instrument(name = "Service::todo::delete", skip_all)]
    pub async fn delete(&self, todo_id: TodoId) -> Result<(), AppError> {
        info!(todo_id = %todo_id, "delete todo");

        measure_and_record_service("delete_todo", || async {
            self.storage.delete(todo_id).await
        })
        .await
        .map_err(Into::into)
    }
}
