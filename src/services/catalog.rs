//! Catalog-wide summary service

use serde::Serialize;

use crate::{
    error::AppResult,
    models::BookInstanceStatus,
    repository::Repository,
};

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All five counts, fetched concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let repo = &self.repository;
        let (books, instances, available, authors, genres) = tokio::try_join!(
            repo.books_count(),
            repo.book_instances_count(),
            repo.book_instances_count_by_status(BookInstanceStatus::Available),
            repo.authors_count(),
            repo.genres_count(),
        )?;

        Ok(CatalogCounts {
            book_count: books,
            book_instance_count: instances,
            book_instance_available_count: available,
            author_count: authors,
            genre_count: genres,
        })
    }
}
