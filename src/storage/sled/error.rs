use std::path::PathBuf;

use sled::transaction::{ConflictableTransactionError, TransactionError};
use strum_macros::AsRefStr;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug, AsRefStr)]
pub enum SledStartupError {
    #[error("Failed to open sled database at {path:?}")]
    OpenDb {
        path: PathBuf,
        #[source]
        source: sled::Error,
    },

    #[error("Failed to open sled tree `{tree}`")]
    OpenTree {
        tree: &'static str,
        #[source]
        source: sled::Error,
    },
}

#[derive(Error, Debug, AsRefStr)]
pub enum SledStorageError {
    #[error("Data for key not found")]
    NotFound,

    #[error("Failed to encode data")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode data")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Sled error")]
    Sled(#[from] sled::Error),

    #[error("Id sequence has unexpected length: {0} bytes")]
    InvalidSequence(usize),

    #[error("sled unabortable transaction error")]
    UnabortableTransaction(#[from] sled::transaction::UnabortableTransactionError),
}

impl From<SledStorageError> for ConflictableTransactionError<SledStorageError> {
    fn from(value: SledStorageError) -> Self {
        match value {
            // conflicts must reach sled untouched so the transaction is retried
            SledStorageError::UnabortableTransaction(e) => e.into(),
            other => ConflictableTransactionError::Abort(other),
        }
    }
}

impl From<TransactionError<SledStorageError>> for SledStorageError {
    fn from(value: TransactionError<SledStorageError>) -> Self {
        match value {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => Self::Sled(e),
        }
    }
}

impl From<SledStorageError> for StorageError {
    fn from(value: SledStorageError) -> Self {
        match value {
            SledStorageError::NotFound => {
                tracing::warn!(error = ?value, error_type = %value.as_ref(), "Record not found by id");
                Self::NotFound
            }
            _ => {
                tracing::error!(error = ?value, error_type = %value.as_ref(), "Storage error");
                Self::Backend(value)
            }
        }
    }
}
