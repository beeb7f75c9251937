//! One ECS-shaped JSON line per HTTP request.
//!
//! The middleware is the outermost layer of the router. It owns the request timer,
//! catches handler panics (answering them with an opaque 500), and writes the
//! finished record to every configured sink. Nothing in here may fail the
//! request: serialisation and sink errors are dropped.

mod sink;

use std::{
    net::{IpAddr, SocketAddr},
    panic::AssertUnwindSafe,
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::USER_AGENT, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use futures_util::FutureExt;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, warn};

pub use sink::{AccessLogSink, FileSink, MemorySink, StdoutSink};

use crate::{
    config::LoggingConfig,
    handlers::error::{internal_error_response, InternalErrorMessage},
    middleware::status_class,
    utils::metrics::ACCESS_LOG_DROPPED,
};

pub(crate) const EVENT_ACTION: &str = "http_request";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccessLogRecord {
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    #[serde(rename = "log.level")]
    pub level: &'static str,
    #[serde(rename = "event.action")]
    pub action: &'static str,
    #[serde(rename = "http.request.method")]
    pub method: String,
    #[serde(rename = "http.response.status_code")]
    pub status_code: u16,
    #[serde(rename = "url.path")]
    pub path: String,
    #[serde(rename = "url.query")]
    pub query: String,
    #[serde(rename = "client.ip")]
    pub client_ip: Option<String>,
    #[serde(rename = "user_agent.original")]
    pub user_agent: Option<String>,
    #[serde(rename = "service.name")]
    pub service_name: String,
    #[serde(rename = "metrics.response_time_ms")]
    pub response_time_ms: f64,
    pub status_class: &'static str,
    #[serde(rename = "error.message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// What the logger needs from the request, taken before the request is handed on.
#[derive(Debug, Clone)]
struct RequestInfo {
    method: String,
    path: String,
    query: String,
    client_ip: Option<IpAddr>,
    user_agent: Option<String>,
}

impl RequestInfo {
    fn from_request(req: &Request, x_forwarded_for: bool) -> Self {
        let forwarded = x_forwarded_for
            .then(|| {
                req.headers()
                    .get("x-forwarded-for")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .and_then(|v| v.trim().parse::<IpAddr>().ok())
            })
            .flatten();

        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.ip());

        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().unwrap_or_default().to_string(),
            client_ip: forwarded.or(peer),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

pub(crate) fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1_000_000.0).round() / 1000.0
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Shared, immutable logger state handed to the middleware.
#[derive(Clone)]
pub struct RequestLogger {
    inner: Arc<RequestLoggerInner>,
}

struct RequestLoggerInner {
    service_name: String,
    x_forwarded_for: bool,
    sinks: Vec<Arc<dyn AccessLogSink>>,
}

impl RequestLogger {
    pub fn new(service_name: impl Into<String>, sinks: Vec<Arc<dyn AccessLogSink>>) -> Self {
        Self {
            inner: Arc::new(RequestLoggerInner {
                service_name: service_name.into(),
                x_forwarded_for: false,
                sinks,
            }),
        }
    }

    pub fn with_x_forwarded_for(self, enabled: bool) -> Self {
        let inner = RequestLoggerInner {
            service_name: self.inner.service_name.clone(),
            x_forwarded_for: enabled,
            sinks: self.inner.sinks.clone(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Stdout and/or file sinks from config. A file that cannot be opened is skipped
    /// with a warning; the remaining sinks still work.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut sinks: Vec<Arc<dyn AccessLogSink>> = Vec::new();

        if config.stdout {
            sinks.push(Arc::new(StdoutSink));
        }

        if let Some(path) = config.file_path() {
            match FileSink::open(path) {
                Ok(sink) => sinks.push(Arc::new(sink)),
                Err(e) => {
                    warn!(error = %e, path = ?path, "access log file sink disabled");
                }
            }
        }

        Self::new(config.service_name.clone(), sinks).with_x_forwarded_for(config.x_forwarded_for)
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.len()
    }

    fn build_record(
        &self,
        request: RequestInfo,
        status: StatusCode,
        elapsed: Duration,
        error_message: Option<String>,
    ) -> AccessLogRecord {
        AccessLogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            level: if error_message.is_some() { "error" } else { "info" },
            action: EVENT_ACTION,
            method: request.method,
            status_code: status.as_u16(),
            path: request.path,
            query: request.query,
            client_ip: request.client_ip.map(|ip| ip.to_string()),
            user_agent: request.user_agent,
            service_name: self.inner.service_name.clone(),
            response_time_ms: round_millis(elapsed),
            status_class: status_class(status.as_u16()),
            error_message,
        }
    }

    /// Writes the record to every sink. A sink that errors or panics loses this
    /// line; the others still get it.
    pub fn emit(&self, record: &AccessLogRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "failed to serialise access log record");
                ACCESS_LOG_DROPPED.add(1, &[]);
                return;
            }
        };

        for sink in &self.inner.sinks {
            match std::panic::catch_unwind(AssertUnwindSafe(|| sink.write_line(&line))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(error = %e, "access log sink write failed");
                    ACCESS_LOG_DROPPED.add(1, &[]);
                }
                Err(_) => {
                    debug!("access log sink panicked");
                    ACCESS_LOG_DROPPED.add(1, &[]);
                }
            }
        }
    }
}

pub(crate) async fn access_log(
    State(logger): State<RequestLogger>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request = RequestInfo::from_request(&req, logger.inner.x_forwarded_for);

    let (response, error_message) = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => {
            let message = response
                .extensions()
                .get::<InternalErrorMessage>()
                .map(|m| m.0.clone());
            (response, message)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(error = %message, method = %request.method, path = %request.path, "handler panicked");
            (internal_error_response(message.clone()), Some(message))
        }
    };

    let record = logger.build_record(request, response.status(), start.elapsed(), error_message);
    logger.emit(&record);

    response
}
