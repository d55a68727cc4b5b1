//! Genre pages

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{book::BookBriefView, genre::GenreView},
    views, AppState,
};

use super::parse_id;

#[derive(Serialize)]
struct GenreListPage {
    title: &'static str,
    genre_list: Vec<GenreView>,
}

#[derive(Serialize)]
struct GenreDetailPage {
    title: &'static str,
    genre: GenreView,
    genre_books: Vec<BookBriefView>,
}

pub async fn genre_list(State(state): State<AppState>) -> AppResult<Response> {
    let genres = state.services.genres.list().await?;
    views::page(
        "genre_list.html",
        &GenreListPage {
            title: "Genre List",
            genre_list: genres.iter().map(GenreView::from).collect(),
        },
    )
}

/// A genre and the books filed under it
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    let (genre, books) = state.services.genres.detail(id).await?;
    views::page(
        "genre_detail.html",
        &GenreDetailPage {
            title: "Genre Detail",
            genre: GenreView::from(&genre),
            genre_books: books.iter().map(BookBriefView::from).collect(),
        },
    )
}
