use std::{fmt::Display, future::Future};

use super::{elapsed_ms, metrics, APP_NAME};

use opentelemetry::KeyValue;
use tokio::time::Instant;
use tracing::error;

fn outcome<T, E: Display>(operation: &'static str, result: &Result<T, E>) -> [KeyValue; 3] {
    let (status, error) = match result {
        Ok(_) => ("ok", "NA".to_string()),
        Err(e) => ("error", e.to_string()),
    };

    [
        KeyValue::new("operation", operation),
        KeyValue::new("status", status),
        KeyValue::new("error", error),
    ]
}

pub async fn measure_and_record_service<F, T, E>(
    operation: &'static str,
    f: impl FnOnce() -> F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let start = Instant::now();
    let result = f().await;

    metrics::SERVICE_OPERATION_DURATION_MS.record(
        elapsed_ms(start.elapsed()),
        &outcome(operation, &result),
    );

    result
}

pub fn measure_and_record_storage<T, E>(
    operation: &'static str,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    E: Display,
{
    let start = Instant::now();
    let result = f();

    let mut attributes = outcome(operation, &result).to_vec();
    attributes.push(KeyValue::new("storage", "sled"));
    metrics::STORAGE_OPERATION_DURATION_MS.record(elapsed_ms(start.elapsed()), &attributes);

    result
}

/// Resident set size of this process, sampled on each metrics export.
pub(crate) fn init_memory_metrics() {
    opentelemetry::global::meter(APP_NAME)
        .f64_observable_gauge("process_resident_memory_bytes")
        .with_description("Resident memory size in bytes")
        .with_unit("bytes")
        .with_callback(|observer| {
            let pid = match sysinfo::get_current_pid() {
                Ok(pid) => pid,
                Err(err) => {
                    error!(error = %err, "failed to get current pid");
                    return;
                }
            };

            let mut system = sysinfo::System::new();
            system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), false);

            match system.process(pid) {
                Some(process) => observer.observe(process.memory() as f64, &[]),
                None => error!(%pid, "current process missing from sysinfo"),
            }
        })
        .build();
}
