pub(crate) mod types;

use std::net::SocketAddr;

use config::{Config, Environment, File};
use serde::Deserialize;
pub(crate) use types::{LoggingConfig, ServerConfig, StorageSettings, TelemetryConfig};

use crate::{init::StartupError, trace_err};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub(crate) storage: StorageSettings,
    pub(crate) telemetry: TelemetryConfig,
    pub(crate) server: ServerConfig,
    pub(crate) logging: LoggingConfig,
}

impl Settings {
    pub fn new() -> Result<Self, StartupError> {
        dotenv::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or("development".into());

        Settings::from_file(&run_mode)
    }

    pub fn from_file(file_name: &str) -> Result<Self, StartupError> {
        trace_err!(
            Config::builder()
                .add_source(File::with_name("config/default"))
                .add_source(File::with_name(&format!("config/{file_name}")).required(false))
                .add_source(Environment::with_prefix("APP").separator("__"))
                .build()?
                .try_deserialize(),
            "failed to build app settings"
        )
        .map_err(Into::into)
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server.addr
    }

    pub fn tracing_enabled(&self) -> bool {
        self.telemetry.tracing
    }

    pub fn metrics_enabled(&self) -> bool {
        self.telemetry.metrics
    }

    pub fn service_name(&self) -> &str {
        &self.logging.service_name
    }
}
