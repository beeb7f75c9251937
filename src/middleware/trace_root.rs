use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

use crate::{middleware::normalize_uri, utils::RootSpan};

/// Opens the per-request root span and hands it to handlers as an extension.
/// Server errors are force-sampled.
pub(crate) async fn trace_root(mut req: Request, next: Next) -> Response {
    let root_span = RootSpan::new(req.method().as_str(), &normalize_uri(req.uri().path()));
    req.extensions_mut().insert(root_span.clone());

    let response = next.run(req).instrument(root_span.span().clone()).await;
    let status = response.status();

    let recorder = root_span.record();
    recorder.http_status_code(&status);

    match (status.is_server_error(), status.is_client_error()) {
        (true, _) => {
            recorder.status("error").force_sample();
        }
        (false, true) => {
            recorder.status("rejected");
        }
        _ => {
            recorder.status("ok");
        }
    }

    response
}
