mod observability;
mod storage;

use crate::storage::SledStartupError;
use thiserror::Error;

pub use observability::{init_logging, init_metrics_provider, init_tracer_provider};
pub use storage::init_storage;

/// Anything that stops the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load configs")]
    LoadConfig(#[from] config::ConfigError),

    #[error("Missing storage config section: {0}")]
    MissingStorageConfig(String),

    #[error("Failed to open sled storage")]
    OpenSledStorage(#[from] SledStartupError),

    #[error("Failed to build OTLP exporter")]
    InitTracing(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("Failed to bridge log records into tracing")]
    InitLogBridge(#[from] tracing_log::log::SetLoggerError),

    #[error("Failed to set global tracing subscriber")]
    SetGlobalTracingProvider(#[from] tracing::subscriber::SetGlobalDefaultError),
}
