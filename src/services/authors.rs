//! Author service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, BookBrief, NewAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    /// Author plus the books they wrote, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<(Author, Vec<BookBrief>)> {
        let (author, books) = tokio::try_join!(
            self.repository.authors_get(id),
            self.repository.books_by_author(id),
        )?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok((author, books))
    }

    pub async fn create(&self, data: &NewAuthor) -> AppResult<Author> {
        let author = self.repository.authors_create(data).await?;
        tracing::info!("Author created: id={}", author.id);
        Ok(author)
    }
}
