pub(crate) mod access_log;
pub(crate) mod metrics;
pub(crate) mod trace_root;

use once_cell::sync::Lazy;
use regex::Regex;

static ID_SEGMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("Invalid id segment regex"));

/// Collapses numeric path segments so `/api/todos/17` and `/api/todos/18` share one label.
pub(crate) fn normalize_uri(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if ID_SEGMENT_REGEX.is_match(segment) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Bucket a status code by its hundreds digit; codes outside 100..=599 are `unknown`.
pub(crate) fn status_class(code: u16) -> &'static str {
    match code / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    }
}
