//! HTML rendering.
//!
//! Templates are compiled into the binary and parsed once into a shared
//! [`Tera`] instance. Text coming from storage was escaped when it was
//! submitted, so templates print it with `| safe`.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{AppError, AppResult};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("error.html", include_str!("../../templates/error.html")),
    ("author_list.html", include_str!("../../templates/author_list.html")),
    ("author_detail.html", include_str!("../../templates/author_detail.html")),
    ("author_form.html", include_str!("../../templates/author_form.html")),
    ("book_list.html", include_str!("../../templates/book_list.html")),
    ("book_detail.html", include_str!("../../templates/book_detail.html")),
    ("book_form.html", include_str!("../../templates/book_form.html")),
    ("book_delete.html", include_str!("../../templates/book_delete.html")),
    ("bookinstance_list.html", include_str!("../../templates/bookinstance_list.html")),
    ("bookinstance_detail.html", include_str!("../../templates/bookinstance_detail.html")),
    ("bookinstance_form.html", include_str!("../../templates/bookinstance_form.html")),
    ("genre_list.html", include_str!("../../templates/genre_list.html")),
    ("genre_detail.html", include_str!("../../templates/genre_detail.html")),
];

static TERA: Lazy<Result<Tera, tera::Error>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
});

fn tera() -> AppResult<&'static Tera> {
    TERA.as_ref()
        .map_err(|e| AppError::Internal(format!("Failed to load templates: {:?}", e)))
}

/// Parse every template up front so a broken one stops startup.
pub fn init() -> AppResult<()> {
    tera().map(|_| ())
}

/// Render `template` with a serializable page model
pub fn render<T: Serialize>(template: &str, page: &T) -> AppResult<Html<String>> {
    let context = Context::from_serialize(page)?;
    Ok(Html(tera()?.render(template, &context)?))
}

/// `render`, as a response
pub fn page<T: Serialize>(template: &str, page: &T) -> AppResult<Response> {
    Ok(render(template, page)?.into_response())
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    title: &'a str,
    status: u16,
    message: &'a str,
}

/// The generic error view; plain text if the template itself cannot render.
pub fn error_page(status: StatusCode, message: &str) -> Response {
    let page = ErrorPage {
        title: "Error",
        status: status.as_u16(),
        message,
    };
    match render("error.html", &page) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, format!("{} {}", status.as_u16(), message)).into_response()
        }
    }
}
