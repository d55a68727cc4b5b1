//! Book instance (copy) queries

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use super::PgStore;
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceStatus, BookInstanceWithBook, BookTitle, NewBookInstance},
    repository::BookInstanceStore,
};

fn with_book(row: &PgRow) -> BookInstanceWithBook {
    BookInstanceWithBook {
        instance: BookInstance {
            id: row.get("id"),
            book_id: row.get("book_id"),
            imprint: row.get("imprint"),
            status: row.get("status"),
            due_back: row.get("due_back"),
        },
        book: BookTitle {
            id: row.get("book_id"),
            title: row.get("book_title"),
        },
    }
}

#[async_trait]
impl BookInstanceStore for PgStore {
    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.title AS book_title
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            ORDER BY b.title, bi.imprint
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(with_book).collect())
    }

    async fn book_instances_get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>> {
        let row = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.title AS book_title
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(with_book))
    }

    async fn book_instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, status, due_back
            FROM book_instances
            WHERE book_id = $1
            ORDER BY imprint
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn book_instances_create(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status)
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn book_instances_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn book_instances_count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
