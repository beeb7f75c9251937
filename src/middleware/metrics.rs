use axum::{extract::Request, middleware::Next, response::Response};
use opentelemetry::KeyValue;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::{
    middleware::{normalize_uri, status_class},
    utils::{elapsed_ms, metrics},
};

/// Request count and latency, labelled by route template rather than raw path so
/// todo ids do not explode the label set.
#[instrument(name = "middleware::record_metrics", skip_all)]
pub(crate) async fn record_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = normalize_uri(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status();
    let attributes = [
        KeyValue::new("method", method),
        KeyValue::new("route", route),
        KeyValue::new("status_class", status_class(status.as_u16())),
        KeyValue::new("http_status_code", i64::from(status.as_u16())),
    ];

    debug!(?elapsed, %status, "request measured");

    metrics::HTTP_REQUESTS.add(1, &attributes);
    metrics::HTTP_REQUEST_DURATION_MS.record(elapsed_ms(elapsed), &attributes);

    response
}
