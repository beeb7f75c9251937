use crate::storage::{NewTodo, TodoId};
use crate::trace_err;
use crate::utils::blocking_task_guard::BlockingTaskGuard;
use crate::utils::measure_metrics::measure_and_record_storage;

use super::error::SledStorageError;
use super::internal::span_wrappers::{
    deserialize_in_span, get_value_in_transaction_with_span, get_value_with_span,
    insert_value_in_transaction_with_span, remove_value_with_span, scan_prefix_rev_with_span,
    serialize_in_transaction_with_span,
};
use super::internal::{TreeKey, TODO_PREFIX};
use super::{decode_sequence, encode_sequence};
use super::{BincodeConfig, SledStorage};
use super::{StorageError, Todo, TodoPatch, TodoStorage, TodoVersion};
use async_trait::async_trait;
use sled::{transaction::ConflictableTransactionResult, Tree};
use tracing::{info, info_span, instrument, Span};

#[async_trait]
impl TodoStorage for SledStorage {
    #[instrument(name = "SledStorage::list_todos", skip_all)]
    async fn list(&self) -> Result<Vec<Todo>, StorageError> {
        measure_and_record_storage("SledStorage::list_todos", || {
            let values = trace_err!(
                scan_prefix_rev_with_span(TODO_PREFIX, &self.todo_tree),
                "failed to scan todos"
            )?;

            values
                .iter()
                .map(|value| -> Result<Todo, SledStorageError> {
                    Ok(trace_err!(
                        deserialize_in_span::<TodoVersion>(&self.bincode_config, value),
                        "failed to bin decode todo"
                    )?
                    .into())
                })
                .collect::<Result<Vec<Todo>, SledStorageError>>()
        })
        .map_err(Into::into)
    }

    #[instrument(name = "SledStorage::create_todo", skip_all)]
    async fn create(&self, new: NewTodo) -> Result<Todo, StorageError> {
        // cloning tree should be cheap: struct Tree{inner: Arc<TreeInner>}
        let (todo_tree, bincode_config) = info_span!("Cloning trees and config")
            .in_scope(|| (self.todo_tree.clone(), self.bincode_config));

        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _guard = BlockingTaskGuard::new("create_todo");
            span.in_scope(|| create_todo(new, &todo_tree, &bincode_config))
        })
        .await?
    }

    #[instrument(name = "SledStorage::get_todo", skip_all)]
    async fn get(&self, todo_id: TodoId) -> Result<Todo, StorageError> {
        info!(todo_id = %todo_id, "get todo");

        measure_and_record_storage("SledStorage::get_todo", || {
            let value = trace_err!(
                get_value_with_span(TreeKey::Todo(todo_id), &self.todo_tree),
                "failed to read todo from storage"
            )?;

            Ok::<Todo, SledStorageError>(
                trace_err!(
                    deserialize_in_span::<TodoVersion>(&self.bincode_config, &value),
                    "failed to bin decode todo"
                )?
                .into(),
            )
        })
        .map_err(Into::into)
    }

    #[instrument(name = "SledStorage::update_todo", skip_all)]
    async fn update(&self, todo_id: TodoId, patch: TodoPatch) -> Result<Todo, StorageError> {
        let (todo_tree, bincode_config) = info_span!("Cloning trees and config")
            .in_scope(|| (self.todo_tree.clone(), self.bincode_config));

        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _guard = BlockingTaskGuard::new("update_todo");
            span.in_scope(|| update_todo(todo_id, patch, &todo_tree, &bincode_config))
        })
        .await?
    }

    #[instrument(name = "SledStorage::delete_todo", skip_all)]
    async fn delete(&self, todo_id: TodoId) -> Result<(), StorageError> {
        info!(todo_id = %todo_id, "delete todo");

        measure_and_record_storage("SledStorage::delete_todo", || {
            trace_err!(
                remove_value_with_span(TreeKey::Todo(todo_id), &self.todo_tree),
                "failed to remove todo from storage"
            )
        })
        .map_err(Into::into)
    }
}

/// Advances the id sequence and inserts the todo in one transaction, so concurrent
/// creators never observe the same id.
#[instrument(name = "create_todo", skip_all)]
fn create_todo(
    new: NewTodo,
    todo_tree: &Tree,
    bincode_config: &BincodeConfig,
) -> Result<Todo, StorageError> {
    let todo = measure_and_record_storage("SledStorage::create_todo_in_transaction", || {
        todo_tree.transaction(|tx| -> ConflictableTransactionResult<Todo, SledStorageError> {
            let last = trace_err!(
                get_value_in_transaction_with_span(TreeKey::Sequence, tx),
                "failed to read todo id sequence"
            )?;

            let id = match decode_sequence(last.as_deref())? {
                Some(last) => last.next(),
                None => TodoId::FIRST,
            };

            let todo = Todo::new(id, new.clone());

            let encoded = trace_err!(
                serialize_in_transaction_with_span(
                    bincode_config,
                    &TodoVersion::from(todo.clone())
                ),
                "failed to bin encode todo"
            )?;

            let sequence = encode_sequence(&id);
            trace_err!(
                insert_value_in_transaction_with_span(TreeKey::Sequence, &sequence, tx),
                "failed to advance todo id sequence"
            )?;

            trace_err!(
                insert_value_in_transaction_with_span(TreeKey::Todo(id), &encoded, tx),
                "failed to write todo into storage"
            )?;

            Ok(todo)
        })
    })
    .map_err(SledStorageError::from)?;

    info!(todo_id = %todo.id, "created todo");

    Ok(todo)
}

#[instrument(name = "update_todo", skip_all)]
fn update_todo(
    todo_id: TodoId,
    patch: TodoPatch,
    todo_tree: &Tree,
    bincode_config: &BincodeConfig,
) -> Result<Todo, StorageError> {
    info!(todo_id = %todo_id, "update todo");

    let todo = measure_and_record_storage("SledStorage::update_todo_in_transaction", || {
        todo_tree.transaction(|tx| -> ConflictableTransactionResult<Todo, SledStorageError> {
            let key = TreeKey::Todo(todo_id);
            let value = trace_err!(
                get_value_in_transaction_with_span(key, tx),
                "failed to read todo from storage"
            )?;

            if let Some(value) = value {
                let mut todo: Todo = trace_err!(
                    deserialize_in_span::<TodoVersion>(bincode_config, &value),
                    "failed to bin decode todo"
                )?
                .into();

                todo.apply(&patch);

                let encoded = trace_err!(
                    serialize_in_transaction_with_span(
                        bincode_config,
                        &TodoVersion::from(todo.clone())
                    ),
                    "failed to bin encode todo"
                )?;

                trace_err!(
                    insert_value_in_transaction_with_span(key, &encoded, tx),
                    "failed to write todo into storage"
                )?;

                Ok(todo)
            } else {
                tracing::warn!("failed to find todo in the storage");
                Err(SledStorageError::NotFound.into())
            }
        })
    })
    .map_err(SledStorageError::from)?;

    Ok(todo)
}

#[cfg(test)]
mod tests;
