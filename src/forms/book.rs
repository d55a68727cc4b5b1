//! Book form

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::{
    field_errors, parse_identifiers, validate_identifier, validate_identifiers, FieldError,
    FormPayload,
};
use crate::models::{Book, NewBook};

const FIELD_ORDER: &[&str] = &["title", "author", "summary", "isbn", "genre"];

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "validate_identifier", message = "Author is not a valid identifier.")
    )]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(custom(function = "validate_identifiers", message = "Genre is not a valid identifier."))]
    pub genre: Vec<String>,
}

impl BookForm {
    pub fn from_payload(payload: &FormPayload) -> Self {
        Self {
            title: payload.text("title"),
            author: payload.text("author"),
            summary: payload.text("summary"),
            isbn: payload.text("isbn"),
            genre: payload.multi("genre"),
        }
    }

    /// Pre-populated form for editing a stored book
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_ids.iter().map(Uuid::to_string).collect(),
        }
    }

    pub fn validated(&self) -> Result<NewBook, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, FIELD_ORDER))?;

        let author_id = Uuid::parse_str(&self.author).map_err(|_| {
            vec![FieldError {
                field: "author".to_string(),
                message: "Author is not a valid identifier.".to_string(),
            }]
        })?;
        let genre_ids = parse_identifiers(&self.genre).ok_or_else(|| {
            vec![FieldError {
                field: "genre".to_string(),
                message: "Genre is not a valid identifier.".to_string(),
            }]
        })?;

        Ok(NewBook {
            title: self.title.clone(),
            author_id,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre_ids,
        })
    }
}
