pub(super) mod error;
mod flush_impl;
mod internal;
mod todos_impl;

#[cfg(any(test, feature = "integration_tests"))]
pub mod test_util;

use super::{StorageError, Todo, TodoId, TodoPatch, TodoStorage, TodoVersion};
use crate::{config::types::SledConfig, utils::measure_metrics::measure_and_record_storage};
use bincode::config::{self};
use error::{SledStartupError, SledStorageError};
use tracing::{instrument, info_span};

pub(crate) static SLED_TODO_TREE: &str = "todos";
const BINCODE_CONFIG: config::Configuration = config::standard()
    .with_variable_int_encoding()
    .with_little_endian();

use bincode::{Decode, Encode};

type BincodeConfig = bincode::config::Configuration;

trait ToBytesWithConfig: Encode {
    type Error;

    fn to_bytes(&self, config: &BincodeConfig) -> Result<Vec<u8>, Self::Error>;
}

trait FromBytesWithConfig: Decode<()> {
    type Error;

    fn from_bytes(bytes: &[u8], config: &BincodeConfig) -> Result<Self, Self::Error>;
}

pub(crate) struct SledStorage {
    todo_tree: sled::Tree,
    bincode_config: config::Configuration,
}

impl SledStorage {
    #[instrument(name = "Storage::new")]
    pub fn new(sled_config: &SledConfig) -> Result<Self, SledStartupError> {
        measure_and_record_storage("Storage::new", || {
            let db = info_span!("sled::open_db").in_scope(|| {
                let config = sled::Config::default().path(&sled_config.path);
                config.open().map_err(|source| {
                    tracing::error!(error = %source, path = ?sled_config.path, "failed to open db");
                    SledStartupError::OpenDb {
                        path: sled_config.path.clone(),
                        source,
                    }
                })
            })?;

            Self::from_db(&db)
        })
    }

    pub(crate) fn from_db(db: &sled::Db) -> Result<Self, SledStartupError> {
        let todo_tree = info_span!("sled::open_todo_tree").in_scope(|| {
            db.open_tree(SLED_TODO_TREE).map_err(|source| {
                tracing::error!(error = %source, tree_name = SLED_TODO_TREE, "failed to open todo tree");
                SledStartupError::OpenTree {
                    tree: SLED_TODO_TREE,
                    source,
                }
            })
        })?;

        Ok(Self {
            todo_tree,
            bincode_config: BINCODE_CONFIG,
        })
    }
}

/// Last id handed out, stored as big-endian u64. A missing value means no todo was ever created.
fn decode_sequence(bytes: Option<&[u8]>) -> Result<Option<TodoId>, SledStorageError> {
    match bytes {
        None => Ok(None),
        Some(bytes) => {
            let raw: [u8; 8] = bytes
                .try_into()
                .map_err(|_| SledStorageError::InvalidSequence(bytes.len()))?;
            Ok(Some(TodoId::new(u64::from_be_bytes(raw))))
        }
    }
}

fn encode_sequence(id: &TodoId) -> [u8; 8] {
    id.value().to_be_bytes()
}

impl FromBytesWithConfig for TodoVersion {
    type Error = SledStorageError;

    #[instrument(name = "TodoVersion::from_bytes", skip_all)]
    fn from_bytes(bytes: &[u8], config: &BincodeConfig) -> Result<Self, Self::Error> {
        let (todo, _len) = bincode::decode_from_slice::<TodoVersion, _>(bytes, *config)?;
        Ok(todo)
    }
}

impl ToBytesWithConfig for TodoVersion {
    type Error = SledStorageError;

    #[instrument(name = "TodoVersion::to_bytes", skip_all)]
    fn to_bytes(&self, config: &BincodeConfig) -> Result<Vec<u8>, Self::Error> {
        let bytes = bincode::encode_to_vec(self, *config)?;
        Ok(bytes)
    }
}
