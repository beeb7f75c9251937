use tracing::{debug, info, instrument, warn};

use crate::storage::sled::{
    error::SledStorageError, internal::TreeKey, BincodeConfig, FromBytesWithConfig,
    ToBytesWithConfig,
};

#[instrument(name = "sled::get_value_by_key", skip_all)]
pub(crate) fn get_value_with_span(
    key: TreeKey,
    tree: &sled::Tree,
) -> Result<sled::IVec, SledStorageError> {
    info!(key = %key, "get value with key");
    tree.get(key.to_bytes())?.ok_or(SledStorageError::NotFound)
}

#[instrument(name = "sled::remove_value_with_key", skip_all)]
pub(crate) fn remove_value_with_span(
    key: TreeKey,
    tree: &sled::Tree,
) -> Result<(), SledStorageError> {
    info!(key = %key, "remove value with key");
    if tree.remove(key.to_bytes())?.is_none() {
        warn!(key = %key, "Tried to remove non-existing key");
        Err(SledStorageError::NotFound)
    } else {
        Ok(())
    }
}

#[instrument(name = "sled::scan_prefix_rev", skip_all)]
pub(crate) fn scan_prefix_rev_with_span(
    prefix: &str,
    tree: &sled::Tree,
) -> Result<Vec<sled::IVec>, SledStorageError> {
    let values = tree
        .scan_prefix(prefix)
        .rev()
        .map(|entry| entry.map(|(_, value)| value))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(prefix, count = values.len(), "scanned prefix");
    Ok(values)
}

#[instrument(name = "sled::get_value_by_key", skip_all)]
pub(crate) fn get_value_in_transaction_with_span(
    key: TreeKey,
    tree: &sled::transaction::TransactionalTree,
) -> Result<Option<sled::IVec>, SledStorageError> {
    info!(key = %key, "get value with key");
    Ok(tree.get(key.to_bytes())?)
}

#[instrument(name = "sled::insert_value_with_key", skip_all)]
pub(crate) fn insert_value_in_transaction_with_span(
    key: TreeKey,
    value: &[u8],
    tree: &sled::transaction::TransactionalTree,
) -> Result<(), SledStorageError> {
    info!(key = %key, "insert value with key");

    let old_value = tree.insert(key.to_bytes(), value)?;

    if old_value.is_some() && !key.is_todo() {
        debug!(key = %key, "sequence advanced");
    } else if old_value.is_some() {
        info!(key = %key, "todo overwritten");
    }
    Ok(())
}

#[instrument(name = "convert_value_to_bytes", skip_all)]
pub(crate) fn serialize_in_transaction_with_span(
    config: &BincodeConfig,
    value: &impl ToBytesWithConfig<Error = SledStorageError>,
) -> Result<Vec<u8>, SledStorageError> {
    value.to_bytes(config)
}

#[instrument(name = "convert_bytes_to_value", skip_all)]
pub(crate) fn deserialize_in_span<T: FromBytesWithConfig<Error = SledStorageError>>(
    config: &BincodeConfig,
    bytes: &[u8],
) -> Result<T, SledStorageError> {
    T::from_bytes(bytes, config)
}

#[instrument(name = "flush_tree", skip_all)]
pub(crate) fn flush_tree_in_span(
    tree: &sled::Tree,
    tree_name: &'static str,
) -> Result<(), SledStorageError> {
    let bytes = tree.flush()?;
    info!(bytes = %bytes, tree_name = %tree_name, "flushed sled tree");

    Ok(())
}
