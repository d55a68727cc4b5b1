//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, NewAuthor};
pub use book::{Book, BookBrief, BookDetail, BookListEntry, BookTitle, NewBook};
pub use book_instance::{BookInstance, BookInstanceStatus, BookInstanceWithBook, NewBookInstance};
pub use genre::Genre;
