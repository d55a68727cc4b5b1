//! Book instance (copy) service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceWithBook, BookTitle, NewBookInstance},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        self.repository.book_instances_list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceWithBook> {
        self.repository
            .book_instances_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Books to choose from on the copy form
    pub async fn book_options(&self) -> AppResult<Vec<BookTitle>> {
        self.repository.books_titles().await
    }

    pub async fn create(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances_create(data).await?;
        tracing::info!("Book instance created: id={} book={}", instance.id, instance.book_id);
        Ok(instance)
    }
}
