//! Book instance (copy) pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    forms::{BookInstanceForm, FieldError, FormPayload},
    models::{
        book::BookOption,
        book_instance::{BookInstanceView, StatusOption},
        BookTitle,
    },
    views, AppState,
};

use super::{parse_id, redirect_to};

#[derive(Serialize)]
struct BookInstanceListPage {
    title: &'static str,
    bookinstance_list: Vec<BookInstanceView>,
}

#[derive(Serialize)]
struct BookInstanceDetailPage {
    title: String,
    bookinstance: BookInstanceView,
}

#[derive(Serialize)]
struct BookInstanceFormPage {
    title: &'static str,
    book_list: Vec<BookOption>,
    bookinstance: BookInstanceForm,
    statuses: Vec<StatusOption>,
    errors: Vec<FieldError>,
}

pub async fn bookinstance_list(State(state): State<AppState>) -> AppResult<Response> {
    let instances = state.services.book_instances.list().await?;
    views::page(
        "bookinstance_list.html",
        &BookInstanceListPage {
            title: "Book Instance List",
            bookinstance_list: instances.iter().map(BookInstanceView::from).collect(),
        },
    )
}

pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book copy")?;
    let entry = state.services.book_instances.detail(id).await?;
    views::page(
        "bookinstance_detail.html",
        &BookInstanceDetailPage {
            title: format!("Copy of {}", entry.book.title),
            bookinstance: BookInstanceView::from(&entry),
        },
    )
}

pub async fn bookinstance_create_get(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.book_instances.book_options().await?;
    render_form(BookInstanceForm::default(), &books, Vec::new())
}

/// Validate and store a new copy, or re-render the form with errors
pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = BookInstanceForm::from_payload(&FormPayload::new(pairs));
    let data = match form.validated() {
        Ok(data) => data,
        Err(errors) => {
            let books = state.services.book_instances.book_options().await?;
            return render_form(form, &books, errors);
        }
    };

    let instance = state.services.book_instances.create(&data).await?;
    Ok(redirect_to(&instance.url()))
}

fn render_form(
    bookinstance: BookInstanceForm,
    books: &[BookTitle],
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    let book_list = BookOption::mark(books, &bookinstance.book);
    let statuses = StatusOption::mark(&bookinstance.status);
    views::page(
        "bookinstance_form.html",
        &BookInstanceFormPage {
            title: "Create Book Instance",
            book_list,
            bookinstance,
            statuses,
            errors,
        },
    )
}

pub async fn bookinstance_delete_get() -> &'static str {
    "NOT IMPLEMENTED: BookInstance delete GET"
}

pub async fn bookinstance_delete_post() -> &'static str {
    "NOT IMPLEMENTED: BookInstance delete POST"
}

pub async fn bookinstance_update_get() -> &'static str {
    "NOT IMPLEMENTED: BookInstance update GET"
}

pub async fn bookinstance_update_post() -> &'static str {
    "NOT IMPLEMENTED: BookInstance update POST"
}
