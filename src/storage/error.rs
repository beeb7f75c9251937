use thiserror::Error;

pub use super::sled::error::SledStorageError;
use strum_macros::AsRefStr;

/// Backend-independent storage failure. Only `NotFound` is expected in normal operation.
#[derive(Error, Debug, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StorageError {
    #[error("Todo not found")]
    NotFound,

    #[error("Invalid todo id")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Todo id must be ASCII digits, got {0:?}")]
    MalformedId(String),

    #[error("Storage backend failure")]
    Backend(#[source] SledStorageError),

    #[error("Storage task did not complete")]
    BlockingTask(#[from] tokio::task::JoinError),
}
