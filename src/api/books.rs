//! Book pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::{BookForm, FieldError, FormPayload},
    models::{
        author::AuthorOption,
        book::{BookListView, BookView},
        book_instance::BookInstanceView,
        genre::GenreOption,
        Author, Book, BookInstance, BookTitle, Genre,
    },
    services::books::DeleteOutcome,
    views, AppState,
};

use super::{parse_id, redirect_to};

const BOOK_LIST_URL: &str = "/catalog/books";

#[derive(Serialize)]
struct BookListPage {
    title: &'static str,
    book_list: Vec<BookListView>,
}

#[derive(Serialize)]
struct BookDetailPage {
    title: &'static str,
    book: BookView,
    book_instances: Vec<BookInstanceView>,
}

#[derive(Serialize)]
struct BookFormPage {
    title: &'static str,
    book: BookForm,
    authors: Vec<AuthorOption>,
    genres: Vec<GenreOption>,
    errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct BookDeletePage {
    title: &'static str,
    book: BookTitle,
    book_instances: Vec<BookInstanceView>,
}

/// All books by title, with their authors
pub async fn book_list(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.books.list().await?;
    views::page(
        "book_list.html",
        &BookListPage {
            title: "Book List",
            book_list: books.iter().map(BookListView::from).collect(),
        },
    )
}

/// One book with author, genres and copies
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    let (detail, instances) = state.services.books.detail(id).await?;
    views::page(
        "book_detail.html",
        &BookDetailPage {
            title: "Book Detail",
            book: BookView::from(&detail),
            book_instances: instances.iter().map(BookInstanceView::from).collect(),
        },
    )
}

pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Response> {
    let (authors, genres) = state.services.books.form_options().await?;
    render_form("Create Book", BookForm::default(), &authors, &genres, Vec::new())
}

pub async fn book_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = BookForm::from_payload(&FormPayload::new(pairs));
    let data = match form.validated() {
        Ok(data) => data,
        Err(errors) => {
            let (authors, genres) = state.services.books.form_options().await?;
            return render_form("Create Book", form, &authors, &genres, errors);
        }
    };

    let book = state.services.books.create(&data).await?;
    Ok(redirect_to(&book.url()))
}

/// Update form pre-filled from the stored book
pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    let (book, authors, genres) = state.services.books.edit(id).await?;
    render_form(
        "Update Book",
        BookForm::from_book(&book),
        &authors,
        &genres,
        Vec::new(),
    )
}

/// Replace the book's fields; the identifier comes from the path
pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    let form = BookForm::from_payload(&FormPayload::new(pairs));
    let data = match form.validated() {
        Ok(data) => data,
        Err(errors) => {
            let (authors, genres) = state.services.books.form_options().await?;
            return render_form("Update Book", form, &authors, &genres, errors);
        }
    };

    let book = state.services.books.update(id, &data).await?;
    Ok(redirect_to(&book.url()))
}

/// Confirmation page, or the list of copies that block deletion
pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(redirect_to(BOOK_LIST_URL));
    };
    match state.services.books.delete_preview(id).await? {
        (None, _) => Ok(redirect_to(BOOK_LIST_URL)),
        (Some(book), instances) => render_delete(id, Some(book), &instances),
    }
}

/// Delete the book named by the `bookid` field, falling back to the path
pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let payload = FormPayload::new(pairs);
    let raw = payload.optional("bookid").unwrap_or(id);
    let Ok(id) = Uuid::parse_str(&raw) else {
        return Ok(redirect_to(BOOK_LIST_URL));
    };

    match state.services.books.delete(id).await? {
        DeleteOutcome::Deleted => Ok(redirect_to(BOOK_LIST_URL)),
        DeleteOutcome::Blocked { book, instances } => render_delete(id, book, &instances),
    }
}

fn render_form(
    title: &'static str,
    book: BookForm,
    authors: &[Author],
    genres: &[Genre],
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    let authors = AuthorOption::mark(authors, &book.author);
    let genres = GenreOption::mark(genres, &book.genre);
    views::page(
        "book_form.html",
        &BookFormPage {
            title,
            book,
            authors,
            genres,
            errors,
        },
    )
}

fn render_delete(id: Uuid, book: Option<Book>, instances: &[BookInstance]) -> AppResult<Response> {
    let book = match book {
        Some(book) => BookTitle {
            id: book.id,
            title: book.title,
        },
        None => BookTitle {
            id,
            title: String::new(),
        },
    };
    views::page(
        "book_delete.html",
        &BookDeletePage {
            title: "Delete Book",
            book,
            book_instances: instances.iter().map(BookInstanceView::from).collect(),
        },
    )
}
