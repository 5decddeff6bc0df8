//! Payload reading and field-level validation.
//!
//! Create payloads arrive as untyped JSON. [`PayloadReader`] pulls typed
//! fields out of a JSON object one at a time and records every problem it
//! finds as a `validator::ValidationError` keyed by field name, so a single
//! response can report all bad fields at once.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

/// A closed set of string values accepted by an enum-typed field.
pub trait PayloadEnum: Sized + Default {
    /// Accepted wire values, in display order.
    const VARIANTS: &'static [&'static str];

    /// Parses the exact wire value.
    fn parse(value: &str) -> Option<Self>;
}

/// Builds a `ValidationError` with the given code and message.
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Reads typed fields out of a JSON object, collecting validation errors.
///
/// Required accessors return a placeholder value when the field is bad;
/// callers must call [`PayloadReader::finish`] and only build their typed
/// value once it returns `Ok`.
#[derive(Debug)]
pub struct PayloadReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> PayloadReader<'a> {
    /// Creates a reader over `raw`. A non-object payload is itself an error.
    pub fn new(raw: &'a Value) -> Self {
        let mut errors = ValidationErrors::new();
        let fields = raw.as_object();
        if fields.is_none() {
            errors.add("body", field_error("invalid_type", "Expected a JSON object"));
        }
        Self { fields, errors }
    }

    /// Returns the value for `field`, treating JSON `null` as absent.
    fn value(&self, field: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(field))
            .filter(|value| !value.is_null())
    }

    fn reject(&mut self, field: &'static str, code: &'static str, message: impl Into<Cow<'static, str>>) {
        // Without an object there is nothing field-level left to report.
        if self.fields.is_some() {
            self.errors.add(field, field_error(code, message));
        }
    }

    fn missing(&mut self, field: &'static str) {
        self.reject(field, "required", "Required");
    }

    /// Reads a required, non-empty string.
    pub fn required_string(&mut self, field: &'static str) -> String {
        match self.value(field) {
            None => {
                self.missing(field);
                String::new()
            }
            Some(Value::String(s)) if s.is_empty() => {
                self.reject(field, "empty", "Must not be empty");
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.reject(field, "invalid_type", expected("string", other));
                String::new()
            }
        }
    }

    /// Reads an optional string.
    pub fn optional_string(&mut self, field: &'static str) -> Option<String> {
        match self.value(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.reject(field, "invalid_type", expected("string", other));
                None
            }
        }
    }

    /// Reads a required 32-bit integer.
    pub fn required_i32(&mut self, field: &'static str) -> i32 {
        match self.value(field) {
            None => {
                self.missing(field);
                0
            }
            Some(value) => self.integer(field, value).unwrap_or_default(),
        }
    }

    /// Reads an optional 32-bit integer.
    pub fn optional_i32(&mut self, field: &'static str) -> Option<i32> {
        let value = self.value(field)?;
        self.integer(field, value)
    }

    fn integer(&mut self, field: &'static str, value: &Value) -> Option<i32> {
        let n = match value {
            Value::Number(n) => n,
            other => {
                self.reject(field, "invalid_type", expected("integer", other));
                return None;
            }
        };

        let whole = n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i128)
            });

        let Some(whole) = whole else {
            self.reject(field, "invalid_type", "Expected integer, received float");
            return None;
        };

        match i32::try_from(whole) {
            Ok(n) => Some(n),
            Err(_) => {
                self.reject(
                    field,
                    "out_of_range",
                    format!("Number must be between {} and {}", i32::MIN, i32::MAX),
                );
                None
            }
        }
    }

    /// Reads an optional boolean, falling back to `default` when absent.
    pub fn bool_or(&mut self, field: &'static str, default: bool) -> bool {
        match self.value(field) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.reject(field, "invalid_type", expected("boolean", other));
                default
            }
        }
    }

    /// Reads a required enum value.
    pub fn required_enum<T: PayloadEnum>(&mut self, field: &'static str) -> T {
        match self.value(field) {
            None => {
                self.missing(field);
                T::default()
            }
            Some(value) => self.enum_value(field, value).unwrap_or_default(),
        }
    }

    /// Reads an optional enum value, falling back to `default` when absent.
    pub fn enum_or<T: PayloadEnum>(&mut self, field: &'static str, default: T) -> T {
        match self.value(field) {
            None => default,
            Some(value) => self.enum_value(field, value).unwrap_or(default),
        }
    }

    fn enum_value<T: PayloadEnum>(&mut self, field: &'static str, value: &Value) -> Option<T> {
        let Value::String(s) = value else {
            self.reject(field, "invalid_type", expected("string", value));
            return None;
        };

        let parsed = T::parse(s);
        if parsed.is_none() {
            let allowed = T::VARIANTS
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(" | ");
            self.reject(
                field,
                "invalid_enum_value",
                format!("Invalid enum value. Expected {}, received '{}'", allowed, s),
            );
        }
        parsed
    }

    /// Reads a required RFC 3339 timestamp.
    pub fn required_timestamp(&mut self, field: &'static str) -> DateTime<Utc> {
        match self.value(field) {
            None => {
                self.missing(field);
                DateTime::<Utc>::default()
            }
            Some(value) => self.timestamp(field, value).unwrap_or_default(),
        }
    }

    /// Reads an optional RFC 3339 timestamp.
    pub fn optional_timestamp(&mut self, field: &'static str) -> Option<DateTime<Utc>> {
        let value = self.value(field)?;
        self.timestamp(field, value)
    }

    fn timestamp(&mut self, field: &'static str, value: &Value) -> Option<DateTime<Utc>> {
        let parsed = value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        if parsed.is_none() {
            self.reject(field, "invalid_date", "Expected an RFC 3339 date-time");
        }
        parsed
    }

    /// Reads a required free-form JSON value (any non-null value).
    pub fn required_json(&mut self, field: &'static str) -> Value {
        match self.value(field) {
            Some(value) => value.clone(),
            None => {
                self.missing(field);
                Value::Null
            }
        }
    }

    /// Reads an optional free-form JSON value.
    pub fn optional_json(&mut self, field: &'static str) -> Option<Value> {
        self.value(field).cloned()
    }

    /// Records an error found by a caller-side check.
    pub fn add_error(&mut self, field: &'static str, error: ValidationError) {
        self.errors.add(field, error);
    }

    /// Whether `field` has already been rejected.
    pub fn has_error(&self, field: &'static str) -> bool {
        self.errors.errors().contains_key(field)
    }

    /// Returns `Ok` if no field errors were recorded.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn expected(kind: &str, received: &Value) -> String {
    format!("Expected {}, received {}", kind, json_type_name(received))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
