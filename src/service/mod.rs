pub(crate) mod todo;

use std::sync::Arc;

use crate::{
    handlers::error::AppError,
    storage::{FlushStorage, TodoStorage},
    utils::measure_metrics::measure_and_record_service,
};
use todo::ServiceTodoRef;
use tracing::{info, instrument};

/// Handle shared by all handlers. Cloning is cheap; storage sits behind `Arc`s.
#[derive(Clone)]
pub struct Service {
    todo_storage: Arc<dyn TodoStorage>,
    flush_storage: Arc<dyn FlushStorage>,
}

impl Service {
    #[instrument(name = "Service::new", skip_all)]
    pub fn new(todo_storage: Arc<dyn TodoStorage>, flush_storage: Arc<dyn FlushStorage>) -> Self {
        Self {
            todo_storage,
            flush_storage,
        }
    }

    /// One backend serving both the todo and the flush side.
    pub(crate) fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: TodoStorage + FlushStorage + 'static,
    {
        Self::new(backend.clone(), backend)
    }

    pub fn todo(&self) -> ServiceTodoRef {
        ServiceTodoRef::new(self.todo_storage.clone())
    }

    #[instrument(name = "Service::flush_storage", skip_all)]
    pub async fn flush_storage(&self) -> Result<(), AppError> {
        measure_and_record_service("flush_storage", || async {
            self.flush_storage.flush().await.map_err(AppError::from)
        })
        .await?;

        info!("storage flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::test_util::TestStorageBuilder;

    #[tokio::test]
    async fn test_seeded_service_lists_and_flushes() {
        let service = TestStorageBuilder::new()
            .with_todo("seeded", true)
            .build_service()
            .await;

        let todos = service.todo().list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "seeded");
        assert!(todos[0].done);

        service.flush_storage().await.unwrap();
    }
}
