//! Book queries.
//!
//! Genre references live in the `book_genres` junction table and are read
//! back as an aggregated `genre_ids` array.

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use super::PgStore;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookBrief, BookDetail, BookListEntry, BookTitle, Genre, NewBook},
    repository::BookStore,
};

const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
           COALESCE(
               ARRAY_AGG(bg.genre_id) FILTER (WHERE bg.genre_id IS NOT NULL),
               '{}'
           ) AS genre_ids
    FROM books b
    LEFT JOIN book_genres bg ON bg.book_id = b.id
    WHERE b.id = $1
    GROUP BY b.id
"#;

#[async_trait]
impl BookStore for PgStore {
    async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title,
                   a.id AS author_id, a.first_name, a.family_name,
                   a.date_of_birth, a.date_of_death
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| BookListEntry {
                id: r.get("id"),
                title: r.get("title"),
                author: Author {
                    id: r.get("author_id"),
                    first_name: r.get("first_name"),
                    family_name: r.get("family_name"),
                    date_of_birth: r.get("date_of_birth"),
                    date_of_death: r.get("date_of_death"),
                },
            })
            .collect())
    }

    async fn books_titles(&self) -> AppResult<Vec<BookTitle>> {
        let rows = sqlx::query_as::<_, BookTitle>("SELECT id, title FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(SELECT_BOOK)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn books_get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let Some(book) = self.books_get(id).await? else {
            return Ok(None);
        };

        let author_query = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM authors WHERE id = $1",
        )
        .bind(book.author_id)
        .fetch_optional(&self.pool);
        let genres_query = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY name",
        )
        .bind(&book.genre_ids)
        .fetch_all(&self.pool);

        let (author, genres) = tokio::try_join!(author_query, genres_query)?;
        let author = author.ok_or_else(|| {
            AppError::Storage(format!("author {} referenced but missing", book.author_id))
        })?;

        Ok(Some(BookDetail { book, author, genres }))
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<BookBrief>> {
        let rows = sqlx::query_as::<_, BookBrief>(
            "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookBrief>> {
        let rows = sqlx::query_as::<_, BookBrief>(
            r#"
            SELECT b.id, b.title, b.summary
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_create(&self, data: &NewBook) -> AppResult<Book> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO book_genres (book_id, genre_id)
            SELECT $1, g FROM UNNEST($2::uuid[]) AS g
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        let book = sqlx::query_as::<_, Book>(SELECT_BOOK)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn books_update(&self, id: Uuid, data: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO book_genres (book_id, genre_id)
            SELECT $1, g FROM UNNEST($2::uuid[]) AS g
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        let book = sqlx::query_as::<_, Book>(SELECT_BOOK)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
