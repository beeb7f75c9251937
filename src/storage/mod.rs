mod error;
mod ids;
mod sled;
mod todo;

#[cfg(any(test, feature = "integration_tests"))]
pub use sled::test_util;
pub(crate) use sled::{error::SledStartupError, SledStorage};

use async_trait::async_trait;
pub(crate) use error::StorageError;
pub use ids::TodoId;
pub(crate) use todo::TodoVersion;
pub use todo::{NewTodo, Todo, TodoPatch};

#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// All todos, highest id first.
    async fn list(&self) -> Result<Vec<Todo>, StorageError>;
    async fn create(&self, new: NewTodo) -> Result<Todo, StorageError>;
    async fn get(&self, id: TodoId) -> Result<Todo, StorageError>;
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, StorageError>;
    async fn delete(&self, id: TodoId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait FlushStorage: Send + Sync {
    async fn flush(&self) -> Result<(), StorageError>;
}
