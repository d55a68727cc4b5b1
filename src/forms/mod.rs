//! Form payload handling shared by the entity forms.
//!
//! A POST body goes through three explicit steps before anything touches
//! storage: multi-valued fields are normalized into sequences, text is
//! trimmed and HTML-escaped, then the entity's `validator` rules run and
//! their failures are flattened into [`FieldError`]s for the form view.

pub mod author;
pub mod book;
pub mod book_instance;

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

pub use author::AuthorForm;
pub use book::BookForm;
pub use book_instance::BookInstanceForm;

/// Raw `application/x-www-form-urlencoded` body, keeping repeated keys.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

/// How a field arrived in the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Scalar(&'a str),
    Sequence(Vec<&'a str>),
}

impl FormPayload {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn raw(&self, name: &str) -> FieldValue<'_> {
        let mut values: Vec<&str> = self
            .pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect();
        match values.len() {
            0 => FieldValue::Absent,
            1 => FieldValue::Scalar(values.remove(0)),
            _ => FieldValue::Sequence(values),
        }
    }

    /// Trimmed, escaped text; empty when the field is absent.
    /// A repeated single-valued field keeps its last occurrence.
    pub fn text(&self, name: &str) -> String {
        match self.raw(name) {
            FieldValue::Absent => String::new(),
            FieldValue::Scalar(value) => sanitize(value),
            FieldValue::Sequence(values) => values.last().map(|v| sanitize(v)).unwrap_or_default(),
        }
    }

    /// Trimmed text, `None` when absent or empty
    pub fn optional(&self, name: &str) -> Option<String> {
        let value = self.text(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Normalized, escaped sequence for a multi-valued field
    pub fn multi(&self, name: &str) -> Vec<String> {
        normalize_multi_valued(self.raw(name))
            .iter()
            .map(|value| sanitize(value))
            .collect()
    }
}

/// Absent becomes an empty sequence, a scalar a singleton; sequences pass through.
pub fn normalize_multi_valued(value: FieldValue<'_>) -> Vec<String> {
    match value {
        FieldValue::Absent => Vec::new(),
        FieldValue::Scalar(value) => vec![value.to_string()],
        FieldValue::Sequence(values) => values.into_iter().map(str::to_string).collect(),
    }
}

pub fn sanitize(value: &str) -> String {
    tera::escape_html(value.trim())
}

/// One rejected field, as shown on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten `validator` output, ordered by `order` (form field order).
///
/// Schema-level errors carry the field they belong to in a `field` param.
pub fn field_errors(errors: &ValidationErrors, order: &[&str]) -> Vec<FieldError> {
    let mut flattened = Vec::new();
    for (key, errs) in errors.field_errors() {
        for err in errs.iter() {
            let field = err
                .params
                .get("field")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| key.to_string());
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            flattened.push(FieldError { field, message });
        }
    }
    let rank = |field: &str| order.iter().position(|f| *f == field).unwrap_or(order.len());
    flattened.sort_by(|a, b| {
        rank(&a.field)
            .cmp(&rank(&b.field))
            .then_with(|| a.message.cmp(&b.message))
    });
    flattened
}

pub(crate) fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// ISO 8601 date or timestamp; the time part is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("iso8601")),
    }
}

pub fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

/// Empty values are left to the length rule.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("identifier"))
    }
}

pub fn validate_identifiers(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|value| validate_identifier(value))
}

pub(crate) fn parse_identifiers(values: &[String]) -> Option<Vec<Uuid>> {
    values.iter().map(|v| Uuid::parse_str(v).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> FormPayload {
        FormPayload::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_normalize_multi_valued() {
        assert_eq!(normalize_multi_valued(FieldValue::Absent), Vec::<String>::new());
        assert_eq!(normalize_multi_valued(FieldValue::Scalar("a")), vec!["a"]);
        assert_eq!(
            normalize_multi_valued(FieldValue::Sequence(vec!["a", "b"])),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_raw_classifies_occurrences() {
        let p = payload(&[("genre", "x"), ("title", "t"), ("genre", "y")]);
        assert_eq!(p.raw("genre"), FieldValue::Sequence(vec!["x", "y"]));
        assert_eq!(p.raw("title"), FieldValue::Scalar("t"));
        assert_eq!(p.raw("isbn"), FieldValue::Absent);
    }

    #[test]
    fn test_text_trims_and_escapes() {
        let p = payload(&[("title", "  <b>Bold</b> & more ")]);
        assert_eq!(p.text("title"), "&lt;b&gt;Bold&lt;&#x2F;b&gt; &amp; more");
        assert_eq!(p.text("missing"), "");
        assert_eq!(payload(&[("due_back", "  ")]).optional("due_back"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1920-01-02"), NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(
            parse_date("1992-04-06T10:00:00Z"),
            NaiveDate::from_ymd_opt(1992, 4, 6)
        );
        assert_eq!(parse_date("06/04/1992"), None);
        assert_eq!(parse_date("1992-13-01"), None);
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("").is_ok());
        assert!(validate_identifier(&Uuid::new_v4().to_string()).is_ok());
        assert!(validate_identifier("42").is_err());
        assert!(validate_identifiers(&["nope".to_string()]).is_err());
        assert_eq!(parse_identifiers(&["nope".to_string()]), None);
    }
}
