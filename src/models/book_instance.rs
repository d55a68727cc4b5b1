//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use uuid::Uuid;

use super::{
    author::format_date,
    book::{book_url, BookTitle},
};

/// Lending status of a copy. The member set is fixed; storage rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid book instance status: {}", s))
    }
}

// SQLx conversion for BookInstanceStatus
impl sqlx::Type<Postgres> for BookInstanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookInstanceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookInstanceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Full book instance record from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Validated copy fields, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookInstance {
    pub book_id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl NewBookInstance {
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book_id: self.book_id,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn formatted_due_back(&self) -> String {
        format_date(self.due_back)
    }
}

/// Copy with its book expanded (title only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceWithBook {
    pub instance: BookInstance,
    pub book: BookTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookRef {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub url: String,
    pub formatted_due_back: String,
    pub book: Option<BookRef>,
}

impl From<&BookInstance> for BookInstanceView {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: instance.id,
            imprint: instance.imprint.clone(),
            status: instance.status,
            url: instance.url(),
            formatted_due_back: instance.formatted_due_back(),
            book: None,
        }
    }
}

impl From<&BookInstanceWithBook> for BookInstanceView {
    fn from(entry: &BookInstanceWithBook) -> Self {
        Self {
            book: Some(BookRef {
                id: entry.book.id,
                title: entry.book.title.clone(),
                url: book_url(entry.book.id),
            }),
            ..Self::from(&entry.instance)
        }
    }
}

/// Select entry for the status field
#[derive(Debug, Clone, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

impl StatusOption {
    pub fn mark(selected: &str) -> Vec<Self> {
        BookInstanceStatus::ALL
            .iter()
            .map(|status| Self {
                value: status.as_str(),
                selected: status.as_str() == selected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in BookInstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<BookInstanceStatus>(), Ok(status));
        }
        assert!("Lost".parse::<BookInstanceStatus>().is_err());
        assert!("available".parse::<BookInstanceStatus>().is_err());
    }

    #[test]
    fn test_default_status_is_maintenance() {
        assert_eq!(BookInstanceStatus::default(), BookInstanceStatus::Maintenance);
    }

    #[test]
    fn test_view_expands_book() {
        let book = BookTitle { id: Uuid::new_v4(), title: "Dune".to_string() };
        let entry = BookInstanceWithBook {
            instance: NewBookInstance {
                book_id: book.id,
                imprint: "Ace, 1990".to_string(),
                status: BookInstanceStatus::Loaned,
                due_back: NaiveDate::from_ymd_opt(2026, 10, 19),
            }
            .into_instance(Uuid::new_v4()),
            book,
        };
        let view = BookInstanceView::from(&entry);
        assert_eq!(view.formatted_due_back, "Oct 19, 2026");
        assert_eq!(view.book.map(|b| b.title), Some("Dune".to_string()));
        assert_eq!(view.url, entry.instance.url());
    }
}
