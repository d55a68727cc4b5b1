//! Book model and the shapes it is read back in

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{
    author::{Author, AuthorView},
    genre::{Genre, GenreView},
};

/// Full book record, with its genre references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<Uuid>,
}

/// Validated book fields, ready to be inserted or to replace a stored book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<Uuid>,
}

impl NewBook {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            author_id: self.author_id,
            summary: self.summary,
            isbn: self.isbn,
            genre_ids: self.genre_ids,
        }
    }
}

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// Title projection, used for select options and as an expanded reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookTitle {
    pub id: Uuid,
    pub title: String,
}

/// Title and summary projection, used on author and genre pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookBrief {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

/// Book list row with its author expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListEntry {
    pub id: Uuid,
    pub title: String,
    pub author: Author,
}

/// Book with its author and genres expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookBriefView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl From<&BookBrief> for BookBriefView {
    fn from(book: &BookBrief) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            url: book_url(book.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookListView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub author: AuthorView,
}

impl From<&BookListEntry> for BookListView {
    fn from(entry: &BookListEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            url: book_url(entry.id),
            author: AuthorView::from(&entry.author),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: AuthorView,
    pub genres: Vec<GenreView>,
}

impl From<&BookDetail> for BookView {
    fn from(detail: &BookDetail) -> Self {
        Self {
            id: detail.book.id,
            title: detail.book.title.clone(),
            summary: detail.book.summary.clone(),
            isbn: detail.book.isbn.clone(),
            url: detail.book.url(),
            author: AuthorView::from(&detail.author),
            genres: detail.genres.iter().map(GenreView::from).collect(),
        }
    }
}

/// Select entry on the copy form
#[derive(Debug, Clone, Serialize)]
pub struct BookOption {
    pub id: Uuid,
    pub title: String,
    pub selected: bool,
}

impl BookOption {
    pub fn mark(books: &[BookTitle], selected: &str) -> Vec<Self> {
        books
            .iter()
            .map(|book| Self {
                id: book.id,
                title: book.title.clone(),
                selected: book.id.to_string() == selected,
            })
            .collect()
    }
}
