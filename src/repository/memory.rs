//! In-memory catalog store for tests and local development.
//!
//! Mirrors the PostgreSQL store: same orderings, and references must point
//! at existing records (the foreign keys of the SQL schema).

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookBrief, BookDetail, BookInstance, BookInstanceStatus,
        BookInstanceWithBook, BookListEntry, BookTitle, Genre, NewAuthor, NewBook,
        NewBookInstance,
    },
};

/// Genres the initial migration seeds
pub const DEFAULT_GENRES: &[&str] = &["Fantasy", "Fiction", "Poetry", "Science Fiction"];

#[derive(Default)]
struct Tables {
    authors: HashMap<Uuid, Author>,
    books: HashMap<Uuid, Book>,
    genres: HashMap<Uuid, Genre>,
    book_instances: HashMap<Uuid, BookInstance>,
}

impl Tables {
    fn book_title(&self, id: Uuid) -> AppResult<BookTitle> {
        self.books
            .get(&id)
            .map(|b| BookTitle { id: b.id, title: b.title.clone() })
            .ok_or_else(|| AppError::Storage(format!("book {} referenced but missing", id)))
    }

    fn check_book_references(&self, data: &NewBook) -> AppResult<()> {
        if !self.authors.contains_key(&data.author_id) {
            return Err(AppError::Storage(format!("unknown author {}", data.author_id)));
        }
        if let Some(missing) = data.genre_ids.iter().find(|g| !self.genres.contains_key(g)) {
            return Err(AppError::Storage(format!("unknown genre {}", missing)));
        }
        Ok(())
    }

    fn with_book(&self, instance: &BookInstance) -> AppResult<BookInstanceWithBook> {
        Ok(BookInstanceWithBook {
            instance: instance.clone(),
            book: self.book_title(instance.book_id)?,
        })
    }
}

fn brief(book: &Book) -> BookBrief {
    BookBrief {
        id: book.id,
        title: book.title.clone(),
        summary: book.summary.clone(),
    }
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

/// In-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the default genres
    pub fn seeded() -> Self {
        let genres = DEFAULT_GENRES
            .iter()
            .map(|name| {
                let genre = Genre {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                };
                (genre.id, genre)
            })
            .collect();
        Self {
            tables: Arc::new(RwLock::new(Tables {
                genres,
                ..Tables::default()
            })),
        }
    }

    pub fn insert_genre(&self, name: &str) -> AppResult<Genre> {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.write()?.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| AppError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| AppError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.read()?.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.read()?.authors.get(&id).cloned())
    }

    async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author> {
        let author = data.clone().into_author(Uuid::new_v4());
        self.write()?.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Ok(self.read()?.authors.len() as i64)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let tables = self.read()?;
        let mut entries = tables
            .books
            .values()
            .map(|book| {
                let author = tables.authors.get(&book.author_id).cloned().ok_or_else(|| {
                    AppError::Storage(format!("author {} referenced but missing", book.author_id))
                })?;
                Ok(BookListEntry {
                    id: book.id,
                    title: book.title.clone(),
                    author,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        entries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(entries)
    }

    async fn books_titles(&self) -> AppResult<Vec<BookTitle>> {
        let mut titles: Vec<BookTitle> = self
            .read()?
            .books
            .values()
            .map(|b| BookTitle { id: b.id, title: b.title.clone() })
            .collect();
        titles.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(titles)
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn books_get_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let tables = self.read()?;
        let Some(book) = tables.books.get(&id).cloned() else {
            return Ok(None);
        };
        let author = tables.authors.get(&book.author_id).cloned().ok_or_else(|| {
            AppError::Storage(format!("author {} referenced but missing", book.author_id))
        })?;
        let mut genres: Vec<Genre> = book
            .genre_ids
            .iter()
            .filter_map(|g| tables.genres.get(g).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(BookDetail { book, author, genres }))
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<BookBrief>> {
        let mut books: Vec<BookBrief> = self
            .read()?
            .books
            .values()
            .filter(|b| b.author_id == author_id)
            .map(brief)
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookBrief>> {
        let mut books: Vec<BookBrief> = self
            .read()?
            .books
            .values()
            .filter(|b| b.genre_ids.contains(&genre_id))
            .map(brief)
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn books_create(&self, data: &NewBook) -> AppResult<Book> {
        let mut tables = self.write()?;
        tables.check_book_references(data)?;
        let mut book = data.clone().into_book(Uuid::new_v4());
        book.genre_ids = dedup(&book.genre_ids);
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn books_update(&self, id: Uuid, data: &NewBook) -> AppResult<Book> {
        let mut tables = self.write()?;
        if !tables.books.contains_key(&id) {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tables.check_book_references(data)?;
        let mut book = data.clone().into_book(id);
        book.genre_ids = dedup(&book.genre_ids);
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.write()?;
        if tables.book_instances.values().any(|bi| bi.book_id == id) {
            return Err(AppError::Storage(format!("book {} still has copies", id)));
        }
        tables.books.remove(&id);
        Ok(())
    }

    async fn books_count(&self) -> AppResult<i64> {
        Ok(self.read()?.books.len() as i64)
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let mut genres: Vec<Genre> = self.read()?.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.read()?.genres.get(&id).cloned())
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Ok(self.read()?.genres.len() as i64)
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let tables = self.read()?;
        let mut entries = tables
            .book_instances
            .values()
            .map(|bi| tables.with_book(bi))
            .collect::<AppResult<Vec<_>>>()?;
        entries.sort_by(|a, b| {
            a.book
                .title
                .cmp(&b.book.title)
                .then_with(|| a.instance.imprint.cmp(&b.instance.imprint))
        });
        Ok(entries)
    }

    async fn book_instances_get(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>> {
        let tables = self.read()?;
        tables
            .book_instances
            .get(&id)
            .map(|bi| tables.with_book(bi))
            .transpose()
    }

    async fn book_instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let mut instances: Vec<BookInstance> = self
            .read()?
            .book_instances
            .values()
            .filter(|bi| bi.book_id == book_id)
            .cloned()
            .collect();
        instances.sort_by(|a, b| a.imprint.cmp(&b.imprint));
        Ok(instances)
    }

    async fn book_instances_create(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let mut tables = self.write()?;
        if !tables.books.contains_key(&data.book_id) {
            return Err(AppError::Storage(format!("unknown book {}", data.book_id)));
        }
        let instance = data.clone().into_instance(Uuid::new_v4());
        tables.book_instances.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn book_instances_count(&self) -> AppResult<i64> {
        Ok(self.read()?.book_instances.len() as i64)
    }

    async fn book_instances_count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        Ok(self
            .read()?
            .book_instances
            .values()
            .filter(|bi| bi.status == status)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn new_author(first: &str, family: &str) -> NewAuthor {
        NewAuthor {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn new_book(title: &str, author_id: Uuid, genre_ids: Vec<Uuid>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author_id,
            summary: "summary".to_string(),
            isbn: "isbn".to_string(),
            genre_ids,
        }
    }

    #[test]
    fn test_authors_ordered_by_family_name() {
        let store = MemoryStore::new();
        block_on(store.authors_create(&new_author("Ursula", "Le Guin"))).unwrap();
        block_on(store.authors_create(&new_author("Isaac", "Asimov"))).unwrap();
        block_on(store.authors_create(&new_author("Frank", "Herbert"))).unwrap();

        let families: Vec<_> = block_on(store.authors_list())
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(families, vec!["Asimov", "Herbert", "Le Guin"]);
    }

    #[test]
    fn test_book_requires_existing_references() {
        let store = MemoryStore::new();
        let result = block_on(store.books_create(&new_book("Dune", Uuid::new_v4(), vec![])));
        assert!(matches!(result, Err(AppError::Storage(_))));

        let author = block_on(store.authors_create(&new_author("Frank", "Herbert"))).unwrap();
        let result = block_on(store.books_create(&new_book("Dune", author.id, vec![Uuid::new_v4()])));
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[test]
    fn test_book_detail_expands_references() {
        let store = MemoryStore::new();
        let scifi = store.insert_genre("Science Fiction").unwrap();
        let author = block_on(store.authors_create(&new_author("Frank", "Herbert"))).unwrap();
        let book = block_on(store.books_create(&new_book("Dune", author.id, vec![scifi.id, scifi.id])))
            .unwrap();
        assert_eq!(book.genre_ids, vec![scifi.id]);

        let detail = block_on(store.books_get_detail(book.id)).unwrap().unwrap();
        assert_eq!(detail.author, author);
        assert_eq!(detail.genres, vec![scifi.clone()]);
        assert_eq!(block_on(store.books_by_genre(scifi.id)).unwrap().len(), 1);
        assert!(block_on(store.books_get_detail(Uuid::new_v4())).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_book_is_not_found() {
        let store = MemoryStore::new();
        let author = block_on(store.authors_create(&new_author("Frank", "Herbert"))).unwrap();
        let result = block_on(store.books_update(Uuid::new_v4(), &new_book("Dune", author.id, vec![])));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_missing_book_is_ok() {
        let store = MemoryStore::new();
        assert!(block_on(store.books_delete(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn test_seeded_genres() {
        let genres = block_on(MemoryStore::seeded().genres_list()).unwrap();
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, DEFAULT_GENRES);
        assert!(block_on(MemoryStore::new().genres_list()).unwrap().is_empty());
    }

    #[test]
    fn test_counts_by_status() {
        let store = MemoryStore::seeded();
        assert_eq!(block_on(store.genres_count()).unwrap(), DEFAULT_GENRES.len() as i64);

        let author = block_on(store.authors_create(&new_author("Frank", "Herbert"))).unwrap();
        let book = block_on(store.books_create(&new_book("Dune", author.id, vec![]))).unwrap();
        for status in [BookInstanceStatus::Available, BookInstanceStatus::Available, BookInstanceStatus::Loaned] {
            block_on(store.book_instances_create(&NewBookInstance {
                book_id: book.id,
                imprint: "Ace".to_string(),
                status,
                due_back: None,
            }))
            .unwrap();
        }
        assert_eq!(block_on(store.book_instances_count()).unwrap(), 3);
        assert_eq!(
            block_on(store.book_instances_count_by_status(BookInstanceStatus::Available)).unwrap(),
            2
        );
        assert!(matches!(
            block_on(store.books_delete(book.id)),
            Err(AppError::Storage(_))
        ));
    }
}
