//! Site root and catalog home page

use axum::{
    extract::State,
    http::StatusCode,
    response::{Redirect, Response},
};
use serde::Serialize;

use crate::{error::AppResult, services::catalog::CatalogCounts, views, AppState};

#[derive(Serialize)]
struct IndexPage {
    title: &'static str,
    data: CatalogCounts,
}

/// `/` sends visitors to the catalog
pub async fn home() -> Redirect {
    Redirect::to("/catalog")
}

/// Home page with record counts
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let data = state.services.catalog.counts().await?;
    views::page(
        "index.html",
        &IndexPage {
            title: "Local Library Home",
            data,
        },
    )
}

/// Any route that matched nothing
pub async fn not_found() -> Response {
    views::error_page(StatusCode::NOT_FOUND, "Not Found")
}
