use super::APP_NAME;
use once_cell::sync::Lazy;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};

fn meter() -> Meter {
    global::meter(APP_NAME)
}

/// Answered requests by method, normalised route and status class.
pub static HTTP_REQUESTS: Lazy<Counter<u64>> = Lazy::new(|| {
    meter()
        .u64_counter("todo_http_requests_total")
        .with_description("HTTP requests answered")
        .build()
});

pub static HTTP_REQUEST_DURATION_MS: Lazy<Histogram<f64>> = Lazy::new(|| {
    meter()
        .f64_histogram("todo_http_request_duration_milliseconds")
        .with_unit("ms")
        .build()
});

pub static STORAGE_OPERATION_DURATION_MS: Lazy<Histogram<f64>> = Lazy::new(|| {
    meter()
        .f64_histogram("todo_storage_operation_duration_milliseconds")
        .with_unit("ms")
        .build()
});

pub static SERVICE_OPERATION_DURATION_MS: Lazy<Histogram<f64>> = Lazy::new(|| {
    meter()
        .f64_histogram("todo_service_operation_duration_milliseconds")
        .with_unit("ms")
        .build()
});

/// Access-log lines that a sink refused or that could not be serialised.
pub static ACCESS_LOG_DROPPED: Lazy<Counter<u64>> = Lazy::new(|| {
    meter()
        .u64_counter("todo_access_log_dropped_total")
        .with_description("Access log lines lost to sink or encoding failures")
        .build()
});
