//! Book service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDetail, BookInstance, BookListEntry, Genre, NewBook},
    repository::Repository,
};

/// Result of a delete request
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The book is gone (or was never there)
    Deleted,
    /// Copies still reference the book; nothing was removed
    Blocked {
        book: Option<Book>,
        instances: Vec<BookInstance>,
    },
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookListEntry>> {
        self.repository.books_list().await
    }

    /// Book with author and genres, plus its copies
    pub async fn detail(&self, id: Uuid) -> AppResult<(BookDetail, Vec<BookInstance>)> {
        let (detail, instances) = tokio::try_join!(
            self.repository.books_get_detail(id),
            self.repository.book_instances_by_book(id),
        )?;
        let detail = detail.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok((detail, instances))
    }

    /// Authors and genres to choose from on the book form
    pub async fn form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors_list(), self.repository.genres_list())
    }

    /// Stored book plus the form options, for the update form
    pub async fn edit(&self, id: Uuid) -> AppResult<(Book, Vec<Author>, Vec<Genre>)> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok((book, authors, genres))
    }

    pub async fn create(&self, data: &NewBook) -> AppResult<Book> {
        let book = self.repository.books_create(data).await?;
        tracing::info!("Book created: id={}", book.id);
        Ok(book)
    }

    /// Replace the stored book's fields, keeping its identifier
    pub async fn update(&self, id: Uuid, data: &NewBook) -> AppResult<Book> {
        let book = self.repository.books_update(id, data).await?;
        tracing::info!("Book updated: id={}", book.id);
        Ok(book)
    }

    /// Book and the copies that would block its deletion
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<(Option<Book>, Vec<BookInstance>)> {
        tokio::try_join!(
            self.repository.books_get(id),
            self.repository.book_instances_by_book(id),
        )
    }

    /// Remove the book unless copies still reference it.
    ///
    /// The check and the removal are two separate store calls.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        let (book, instances) = self.delete_preview(id).await?;
        if !instances.is_empty() {
            tracing::info!(
                "Book delete refused: id={} still has {} copies",
                id,
                instances.len()
            );
            return Ok(DeleteOutcome::Blocked { book, instances });
        }

        self.repository.books_delete(id).await?;
        if book.is_some() {
            tracing::info!("Book deleted: id={}", id);
        }
        Ok(DeleteOutcome::Deleted)
    }
}
