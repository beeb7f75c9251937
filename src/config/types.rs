use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use strum_macros::AsRefStr;

#[derive(Debug, Deserialize, Copy, Clone, AsRefStr)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Sled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageKind,
    pub sled: Option<SledConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SledConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub tracing_endpoint: String,
    pub tracing_sampling_rate: f64,
    pub metrics_endpoint: String,
    pub stdout_tracing: bool,
    pub tracing: bool,
    pub metrics: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

/// Where access-log records go. An empty `file` disables the file sink.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub service_name: String,
    pub stdout: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub x_forwarded_for: bool,
}

impl LoggingConfig {
    pub fn file_path(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
