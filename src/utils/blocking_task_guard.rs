//! Sled work parked on tokio's blocking pool, counted per storage operation.

use opentelemetry::KeyValue;

use super::APP_NAME;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};

static IN_FLIGHT: Lazy<DashMap<&'static str, AtomicI64>> = Lazy::new(DashMap::new);

/// Held for the lifetime of one `spawn_blocking` closure.
pub(crate) struct BlockingTaskGuard {
    operation: &'static str,
}

impl BlockingTaskGuard {
    pub(crate) fn new(operation: &'static str) -> Self {
        IN_FLIGHT
            .entry(operation)
            .or_default()
            .fetch_add(1, Ordering::Relaxed);

        Self { operation }
    }
}

impl Drop for BlockingTaskGuard {
    fn drop(&mut self) {
        if let Some(count) = IN_FLIGHT.get(self.operation) {
            count.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
pub(crate) fn in_flight(operation: &str) -> i64 {
    IN_FLIGHT
        .get(operation)
        .map(|count| count.load(Ordering::Relaxed))
        .unwrap_or(0)
}

pub(crate) fn init_blocking_tasks_metric() {
    let _gauge = opentelemetry::global::meter(APP_NAME)
        .i64_observable_gauge("todo_storage_blocking_tasks")
        .with_description("Storage operations waiting on the blocking pool")
        .with_callback(|observer| {
            for entry in IN_FLIGHT.iter() {
                observer.observe(
                    entry.value().load(Ordering::Relaxed),
                    &[KeyValue::new("operation", *entry.key())],
                );
            }
        })
        .build();
}
