//! Inbound JSON validation for todo writes.
//!
//! Bodies are normalised first: a request without a JSON content type, a body
//! that does not parse, or a JSON "falsy" value (`null`, `false`, `0`, `""`,
//! `[]`, `{}`) counts as an empty object. Every field is then checked and all
//! problems are reported together.

use std::collections::BTreeMap;

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::storage::{NewTodo, TodoPatch};

pub(crate) const TITLE_MIN_LEN: usize = 1;
pub(crate) const TITLE_MAX_LEN: usize = 120;

const TITLE: &str = "title";
const DONE: &str = "done";
const SCHEMA: &str = "_schema";

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_A_BOOLEAN: &str = "Not a valid boolean.";
const UNKNOWN_FIELD: &str = "Unknown field.";
const INVALID_INPUT_TYPE: &str = "Invalid input type.";

const TRUTHY: &[&str] = &[
    "t", "T", "true", "True", "TRUE", "on", "On", "ON", "y", "Y", "yes", "Yes", "YES", "1",
];
const FALSY: &[&str] = &[
    "f", "F", "false", "False", "FALSE", "off", "Off", "OFF", "n", "N", "no", "No", "NO", "0",
];

/// Field name to messages, serialised as `{"title": ["..."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Create,
    Update,
}

/// Returns the body only when the request declares a JSON media type
/// (`application/json` or any `+json` suffix), otherwise an empty slice.
pub(crate) fn json_payload<'a>(headers: &HeaderMap, body: &'a [u8]) -> &'a [u8] {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return &[];
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || (essence.contains('/') && essence.ends_with("+json")) {
        body
    } else {
        &[]
    }
}

pub(crate) fn validate_create(body: &[u8]) -> Result<NewTodo, ValidationErrors> {
    let TodoPatch { title, done } = validate(body, Profile::Create)?;

    let title = title.ok_or_else(|| {
        let mut errors = ValidationErrors::default();
        errors.add(TITLE, MISSING);
        errors
    })?;

    Ok(NewTodo {
        title,
        done: done.unwrap_or(false),
    })
}

pub(crate) fn validate_update(body: &[u8]) -> Result<TodoPatch, ValidationErrors> {
    validate(body, Profile::Update)
}

fn validate(body: &[u8], profile: Profile) -> Result<TodoPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let object = normalize_body(body, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut fields = TodoPatch::default();
    for (key, value) in &object {
        match key.as_str() {
            TITLE => fields.title = validate_title(value, &mut errors),
            DONE => fields.done = validate_done(value, &mut errors),
            unknown => errors.add(unknown, UNKNOWN_FIELD),
        }
    }

    if profile == Profile::Create && !object.contains_key(TITLE) {
        errors.add(TITLE, MISSING);
    }

    errors.into_result(|| fields)
}

fn normalize_body(body: &[u8], errors: &mut ValidationErrors) -> Map<String, Value> {
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) => return Map::new(),
    };

    match value {
        Value::Object(object) => object,
        value if is_falsy(&value) => Map::new(),
        _ => {
            errors.add(SCHEMA, INVALID_INPUT_TYPE);
            Map::new()
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(object) => object.is_empty(),
    }
}

fn validate_title(value: &Value, errors: &mut ValidationErrors) -> Option<String> {
    match value {
        Value::Null => {
            errors.add(TITLE, NULL);
            None
        }
        Value::String(title) => {
            let len = title.chars().count();
            if (TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
                Some(title.clone())
            } else {
                errors.add(
                    TITLE,
                    format!("Length must be between {TITLE_MIN_LEN} and {TITLE_MAX_LEN}."),
                );
                None
            }
        }
        _ => {
            errors.add(TITLE, NOT_A_STRING);
            None
        }
    }
}

fn validate_done(value: &Value, errors: &mut ValidationErrors) -> Option<bool> {
    let parsed = match value {
        Value::Null => {
            errors.add(DONE, NULL);
            return None;
        }
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) if TRUTHY.contains(&s.as_str()) => Some(true),
        Value::String(s) if FALSY.contains(&s.as_str()) => Some(false),
        _ => None,
    };

    if parsed.is_none() {
        errors.add(DONE, NOT_A_BOOLEAN);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_create_defaults_done_to_false() {
        let todo = validate_create(&body(json!({"title": "Estudar CI/CD"}))).unwrap();

        assert_eq!(todo.title, "Estudar CI/CD");
        assert!(!todo.done);
    }

    #[test]
    fn test_create_accepts_title_length_bounds() {
        let shortest = validate_create(&body(json!({"title": "a"}))).unwrap();
        assert_eq!(shortest.title, "a");

        let longest = "é".repeat(TITLE_MAX_LEN);
        let todo = validate_create(&body(json!({"title": longest, "done": true}))).unwrap();
        assert_eq!(todo.title.chars().count(), TITLE_MAX_LEN);
        assert!(todo.done);
    }

    #[test]
    fn test_create_rejects_bad_title_length() {
        for title in [String::new(), "x".repeat(TITLE_MAX_LEN + 1)] {
            let errors = validate_create(&body(json!({ "title": title }))).unwrap_err();
            assert_eq!(
                errors.field("title").unwrap(),
                ["Length must be between 1 and 120."]
            );
        }
    }

    #[test]
    fn test_create_requires_title() {
        let errors = validate_create(&body(json!({"done": true}))).unwrap_err();
        assert_eq!(errors.field("title").unwrap(), [MISSING]);
    }

    #[test]
    fn test_malformed_body_is_treated_as_empty_object() {
        let raw_bodies: [&[u8]; 6] = [b"not json", b"", b"{\"title\":", b"null", b"[]", b"0"];
        for raw in raw_bodies {
            let errors = validate_create(raw).unwrap_err();
            assert_eq!(errors.field("title").unwrap(), [MISSING]);
            assert!(errors.field("_schema").is_none());
        }

        assert_eq!(validate_update(b"garbage").unwrap(), TodoPatch::default());
    }

    #[test]
    fn test_non_object_json_is_invalid_input() {
        let errors = validate_update(&body(json!(["title"]))).unwrap_err();
        assert_eq!(errors.field("_schema").unwrap(), [INVALID_INPUT_TYPE]);
    }

    #[test]
    fn test_non_object_json_skips_field_checks_on_create() {
        for value in [json!([1]), json!("title"), json!(true)] {
            let errors = validate_create(&body(value)).unwrap_err();
            assert_eq!(errors.field("_schema").unwrap(), [INVALID_INPUT_TYPE]);
            assert!(errors.field("title").is_none());
        }
    }

    #[test]
    fn test_json_payload_requires_json_content_type() {
        let raw = br#"{"title":"x"}"#;
        let with = |content_type: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, content_type.parse().unwrap());
            headers
        };

        for accepted in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON",
            "application/merge-patch+json",
        ] {
            assert_eq!(json_payload(&with(accepted), raw), raw, "{accepted}");
        }

        for rejected in ["text/plain", "application/x-www-form-urlencoded", "json"] {
            assert!(json_payload(&with(rejected), raw).is_empty(), "{rejected}");
        }
        assert!(json_payload(&HeaderMap::new(), raw).is_empty());

        let errors = validate_create(json_payload(&with("text/plain"), raw)).unwrap_err();
        assert_eq!(errors.field("title").unwrap(), [MISSING]);
    }

    #[test]
    fn test_type_errors_are_collected() {
        let errors =
            validate_create(&body(json!({"title": 5, "done": "maybe", "extra": 1}))).unwrap_err();

        assert_eq!(errors.field("title").unwrap(), [NOT_A_STRING]);
        assert_eq!(errors.field("done").unwrap(), [NOT_A_BOOLEAN]);
        assert_eq!(errors.field("extra").unwrap(), [UNKNOWN_FIELD]);
    }

    #[test]
    fn test_null_fields_are_rejected() {
        let errors = validate_update(&body(json!({"title": null, "done": null}))).unwrap_err();

        assert_eq!(errors.field("title").unwrap(), [NULL]);
        assert_eq!(errors.field("done").unwrap(), [NULL]);
    }

    #[test]
    fn test_done_coercion() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("yes"), true),
            (json!("On"), true),
            (json!(1), true),
            (json!(false), false),
            (json!("F"), false),
            (json!(0), false),
        ] {
            let patch = validate_update(&body(json!({ "done": raw }))).unwrap();
            assert_eq!(patch.done, Some(expected));
        }

        assert!(validate_update(&body(json!({"done": 2}))).is_err());
    }

    // An empty patch is accepted on purpose: it is a no-op, not an error.
    #[test]
    fn test_update_accepts_empty_patch() {
        let patch = validate_update(&body(json!({}))).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_keeps_only_supplied_fields() {
        let patch = validate_update(&body(json!({"done": true}))).unwrap();

        assert_eq!(patch.title, None);
        assert_eq!(patch.done, Some(true));
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let errors = validate_create(&body(json!({}))).unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"title": ["Missing data for required field."]})
        );
    }
}
