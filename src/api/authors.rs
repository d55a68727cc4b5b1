//! Author pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    forms::{AuthorForm, FieldError, FormPayload},
    models::{author::AuthorView, book::BookBriefView},
    views, AppState,
};

use super::{parse_id, redirect_to};

#[derive(Serialize)]
struct AuthorListPage {
    title: &'static str,
    author_list: Vec<AuthorView>,
}

#[derive(Serialize)]
struct AuthorDetailPage {
    title: &'static str,
    author: AuthorView,
    authors_books: Vec<BookBriefView>,
}

#[derive(Serialize)]
struct AuthorFormPage {
    title: &'static str,
    author: AuthorForm,
    errors: Vec<FieldError>,
}

/// All authors, ordered by family name
pub async fn author_list(State(state): State<AppState>) -> AppResult<Response> {
    let authors = state.services.authors.list().await?;
    views::page(
        "author_list.html",
        &AuthorListPage {
            title: "Author List",
            author_list: authors.iter().map(AuthorView::from).collect(),
        },
    )
}

/// One author and their books
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    let (author, books) = state.services.authors.detail(id).await?;
    views::page(
        "author_detail.html",
        &AuthorDetailPage {
            title: "Author detail",
            author: AuthorView::from(&author),
            authors_books: books.iter().map(BookBriefView::from).collect(),
        },
    )
}

pub async fn author_create_get() -> AppResult<Response> {
    render_form(AuthorForm::default(), Vec::new())
}

/// Validate and store a new author, or re-render the form with errors
pub async fn author_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = AuthorForm::from_payload(&FormPayload::new(pairs));
    let data = match form.validated() {
        Ok(data) => data,
        Err(errors) => return render_form(form, errors),
    };

    let author = state.services.authors.create(&data).await?;
    Ok(redirect_to(&author.url()))
}

fn render_form(author: AuthorForm, errors: Vec<FieldError>) -> AppResult<Response> {
    views::page(
        "author_form.html",
        &AuthorFormPage {
            title: "Create Author",
            author,
            errors,
        },
    )
}

pub async fn author_delete_get() -> &'static str {
    "NOT IMPLEMENTED: Author delete GET"
}

pub async fn author_delete_post() -> &'static str {
    "NOT IMPLEMENTED: Author delete POST"
}

pub async fn author_update_get() -> &'static str {
    "NOT IMPLEMENTED: Author update GET"
}

pub async fn author_update_post() -> &'static str {
    "NOT IMPLEMENTED: Author update POST"
}
