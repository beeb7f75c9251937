use super::SledStorage;
use crate::{
    storage::{
        sled::{internal::span_wrappers::flush_tree_in_span, SLED_TODO_TREE},
        FlushStorage, StorageError,
    },
    trace_err,
    utils::{blocking_task_guard::BlockingTaskGuard, measure_metrics::measure_and_record_storage},
};
use async_trait::async_trait;
use tracing::{instrument, Span};

#[async_trait]
impl FlushStorage for SledStorage {
    /// Writes dirty pages to disk off the async workers; called once on shutdown.
    #[instrument(name = "SledStorage::flush", skip_all)]
    async fn flush(&self) -> Result<(), StorageError> {
        let todo_tree = self.todo_tree.clone();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            let _guard = BlockingTaskGuard::new("flush_todos");
            span.in_scope(|| {
                measure_and_record_storage("SledStorage::flush", || {
                    trace_err!(
                        flush_tree_in_span(&todo_tree, SLED_TODO_TREE),
                        "failed to flush todo tree"
                    )
                })
            })
        })
        .await?
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{test_util::TestStorageBuilder, NewTodo};

    #[tokio::test]
    async fn test_flush_after_writes() {
        let builder = TestStorageBuilder::new().with_todos(2);
        let todos = builder.build_todo().await;
        let flush = builder.build_flush().await;

        todos
            .create(NewTodo {
                title: "flushed".to_string(),
                done: true,
            })
            .await
            .unwrap();

        flush.flush().await.unwrap();
        assert_eq!(todos.list().await.unwrap().len(), 3);
    }
}
