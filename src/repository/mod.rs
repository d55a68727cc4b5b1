//! Storage layer.
//!
//! Each entity has its own store trait; [`CatalogStore`] bundles them so the
//! services can hold a single `Arc<dyn CatalogStore>`. References are always
//! expanded by the store call that returns them (joins or id-set fetches),
//! never lazily.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookBrief, BookDetail, BookInstance, BookInstanceStatus,
        BookInstanceWithBook, BookListEntry, BookTitle, Genre, NewAuthor, NewBook,
        NewBookInstance,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by family name
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author>;
    async fn authors_count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Title + expanded author, ordered by title
    async fn books_list(&self) -> AppResult<Vec<BookListEntry>>;
    async fn books_titles(&self) -> AppResult<Vec<BookTitle>>;
    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>>;
    /// Book with author and genres expanded
    async fn books_get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>>;
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<BookBrief>>;
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookBrief>>;
    async fn books_create(&self, data: &NewBook) -> AppResult<Book>;
    /// Replace every mutable field; `NotFound` if the book is gone.
    async fn books_update(&self, id: Uuid, data: &NewBook) -> AppResult<Book>;
    /// Removing a missing book is not an error.
    async fn books_delete(&self, id: Uuid) -> AppResult<()>;
    async fn books_count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by name
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn genres_count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All copies with their book expanded, ordered by book title then imprint
    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceWithBook>>;
    async fn book_instances_get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>>;
    async fn book_instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn book_instances_create(&self, data: &NewBookInstance) -> AppResult<BookInstance>;
    async fn book_instances_count(&self) -> AppResult<i64>;
    async fn book_instances_count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
}

pub trait CatalogStore: AuthorStore + BookStore + GenreStore + BookInstanceStore {}

impl<T> CatalogStore for T where T: AuthorStore + BookStore + GenreStore + BookInstanceStore {}

/// Shared handle to whichever backend is configured
pub type Repository = Arc<dyn CatalogStore>;
