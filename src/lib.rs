mod app;
mod config;
pub(crate) mod handlers;
mod init;
pub(crate) mod middleware;
pub(crate) mod service;
pub(crate) mod storage;
pub(crate) mod utils;

mod docs;

pub use config::Settings;
pub use handlers::error::AppError;
pub use init::StartupError;
pub use middleware::access_log::{AccessLogSink, FileSink, MemorySink, RequestLogger, StdoutSink};

use axum::Router;
use opentelemetry_sdk::{metrics::SdkMeterProvider, trace::SdkTracerProvider};

#[cfg(feature = "integration_tests")]
pub use app::build_app;

#[cfg(feature = "integration_tests")]
pub use storage::{Todo, TodoId};

#[cfg(feature = "integration_tests")]
pub use service::Service;

#[cfg(feature = "integration_tests")]
pub use storage::test_util::TestStorageBuilder;

#[cfg(feature = "integration_tests")]
pub use handlers::types::{ErrorResponse, HealthResponse, MessageResponse};

use tracing::{info, instrument};

/// Owns the telemetry pipeline for the life of the process. Dropping it shuts the
/// OTLP providers down, flushing whatever is still batched.
pub struct TelemetryGuard {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

impl TelemetryGuard {
    /// Installs the global subscriber: OTLP-backed when `telemetry.tracing` is set,
    /// plain diagnostics otherwise. Metrics export is independent of tracing.
    pub fn init(settings: &Settings) -> Result<Self, StartupError> {
        let tracer = if settings.tracing_enabled() {
            Some(init::init_tracer_provider(settings)?)
        } else {
            init::init_logging(settings)?;
            None
        };

        let meter = settings
            .metrics_enabled()
            .then(|| init::init_metrics_provider(settings))
            .transpose()?;

        Ok(Self { tracer, meter })
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(tracer) = self.tracer.take() {
            let _ = tracer.shutdown();
        }
        if let Some(meter) = self.meter.take() {
            let _ = meter.shutdown();
        }
    }
}

#[instrument(name = "init_app", skip_all)]
pub fn init_app(settings: Settings) -> Result<(Router, service::Service), StartupError> {
    info!(settings = ?settings, "init_app with settings");

    let service = init::init_storage(&settings)?;
    let logger = RequestLogger::from_config(&settings.logging);

    info!(
        service_name = settings.service_name(),
        sinks = logger.sink_count(),
        "access log ready"
    );

    Ok((app::build_app(service.clone(), logger), service))
}
