use std::sync::Arc;

use tracing::{info, instrument};

use super::StartupError;
use crate::{service::Service, storage::SledStorage, Settings};

#[instrument(name = "init_storage", skip_all)]
pub fn init_storage(settings: &Settings) -> Result<Service, StartupError> {
    let sled_config = settings
        .storage
        .sled
        .as_ref()
        .ok_or_else(|| StartupError::MissingStorageConfig("storage.sled".to_string()))?;

    info!(
        backend = settings.storage.backend.as_ref(),
        path = ?sled_config.path,
        "opening storage"
    );
    let storage = SledStorage::new(sled_config)?;

    Ok(Service::with_backend(Arc::new(storage)))
}
