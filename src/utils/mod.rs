pub(crate) mod blocking_task_guard;
pub(crate) mod measure_metrics;
pub(crate) mod metrics;
pub(crate) mod root_span;

use std::time::Duration;

pub(crate) static APP_NAME: &str = "kube_ops_todo";

pub(crate) use root_span::RootSpan;

pub(crate) fn elapsed_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Logs the error of a `Result` at error level and hands the `Result` back unchanged.
#[macro_export]
macro_rules! trace_err {
    ($expr:expr, $($arg:tt)*) => {
        $expr.map_err(|e| {
            ::tracing::error!(%e, $($arg)*);
            e
        })
    };
}
