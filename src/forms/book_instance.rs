//! Book instance (copy) form

use serde::Serialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{field_errors, parse_date, validate_identifier, validate_iso_date, FieldError, FormPayload};
use crate::models::{BookInstanceStatus, NewBookInstance};

const FIELD_ORDER: &[&str] = &["book", "imprint", "status", "due_back"];

#[derive(Debug, Clone, Serialize, Validate)]
pub struct BookInstanceForm {
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "validate_identifier", message = "Book must be specified")
    )]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[validate(custom(function = "validate_status", message = "Invalid status"))]
    pub status: String,
    #[validate(custom(function = "validate_iso_date", message = "Invalid date"))]
    pub due_back: Option<String>,
}

impl Default for BookInstanceForm {
    fn default() -> Self {
        Self {
            book: String::new(),
            imprint: String::new(),
            status: BookInstanceStatus::default().as_str().to_string(),
            due_back: None,
        }
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<BookInstanceStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status"))
}

impl BookInstanceForm {
    pub fn from_payload(payload: &FormPayload) -> Self {
        Self {
            book: payload.text("book"),
            imprint: payload.text("imprint"),
            status: payload
                .optional("status")
                .unwrap_or_else(|| BookInstanceStatus::default().as_str().to_string()),
            due_back: payload.optional("due_back"),
        }
    }

    pub fn validated(&self) -> Result<NewBookInstance, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, FIELD_ORDER))?;

        let invalid = |field: &str, message: &str| {
            vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }]
        };
        let book_id = Uuid::parse_str(&self.book)
            .map_err(|_| invalid("book", "Book must be specified"))?;
        let status = self
            .status
            .parse::<BookInstanceStatus>()
            .map_err(|_| invalid("status", "Invalid status"))?;

        Ok(NewBookInstance {
            book_id,
            imprint: self.imprint.clone(),
            status,
            due_back: self.due_back.as_deref().and_then(parse_date),
        })
    }
}
