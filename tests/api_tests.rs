//! HTTP integration tests over the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use tower::ServiceExt;
use uuid::Uuid;

use library_catalog::{
    api::create_router,
    models::{Author, Book, BookInstance, BookInstanceStatus, NewAuthor, NewBook, NewBookInstance},
    repository::{AuthorStore, BookInstanceStore, BookStore, GenreStore, MemoryStore},
    AppConfig, AppState,
};

fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::seeded();
    let state = AppState::new(AppConfig::default(), Arc::new(store.clone()));
    (create_router(state), store)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn add_author(store: &MemoryStore, first_name: &str, family_name: &str) -> Author {
    store
        .authors_create(&NewAuthor {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1920, 1, 2),
            date_of_death: None,
        })
        .await
        .unwrap()
}

async fn add_book(store: &MemoryStore, author: &Author, title: &str) -> Book {
    store
        .books_create(&NewBook {
            title: title.to_string(),
            author_id: author.id,
            summary: "A summary".to_string(),
            isbn: "9780441013593".to_string(),
            genre_ids: Vec::new(),
        })
        .await
        .unwrap()
}

async fn add_copy(store: &MemoryStore, book: &Book, status: BookInstanceStatus) -> BookInstance {
    store
        .book_instances_create(&NewBookInstance {
            book_id: book.id,
            imprint: "Ace, 1990".to_string(),
            status,
            due_back: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, _, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let (app, _) = app();
    let (status, location, _) = get(&app, "/").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_index_shows_counts() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;
    add_copy(&store, &book, BookInstanceStatus::Available).await;
    add_copy(&store, &book, BookInstanceStatus::Loaned).await;

    let (status, _, body) = get(&app, "/catalog").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Books:</strong> 1"));
    assert!(body.contains("<strong>Copies:</strong> 2"));
    assert!(body.contains("<strong>Copies available:</strong> 1"));
    assert!(body.contains("<strong>Authors:</strong> 1"));
    assert!(body.contains("<strong>Genres:</strong> 4"));
}

#[tokio::test]
async fn test_author_list_ordered_by_family_name() {
    let (app, store) = app();
    add_author(&store, "Mary", "Shelley").await;
    add_author(&store, "Isaac", "Asimov").await;

    let (status, _, body) = get(&app, "/catalog/authors").await;

    assert_eq!(status, StatusCode::OK);
    let asimov = body.find("Asimov").unwrap();
    let shelley = body.find("Shelley").unwrap();
    assert!(asimov < shelley);
}

#[tokio::test]
async fn test_author_create_rejects_empty_first_name() {
    let (app, store) = app();
    let (status, location, body) = post_form(
        &app,
        "/catalog/author/create",
        "first_name=&family_name=Asimov",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("First name must be specified."));
    assert!(body.contains("value=\"Asimov\""));
    assert_eq!(store.authors_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_author_create_rejects_death_before_birth() {
    let (app, store) = app();
    let (status, _, body) = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=Asimov&date_of_birth=1992-04-06&date_of_death=1920-01-02",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Date of death must be after date of birth."));
    assert_eq!(store.authors_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_author_create_redirects_to_detail() {
    let (app, store) = app();
    let (status, location, _) = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=Asimov&date_of_birth=1920-01-02&date_of_death=",
    )
    .await;

    let authors = store.authors_list().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].date_of_death, None);
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, Some(format!("/catalog/author/{}", authors[0].id)));

    let (status, _, body) = get(&app, &format!("/catalog/author/{}", authors[0].id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Author: Isaac Asimov"));
}

#[tokio::test]
async fn test_unknown_records_are_not_found() {
    let (app, _) = app();

    let (status, _, body) = get(&app, &format!("/catalog/book/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Book not found"));

    let (status, _, _) = get(&app, "/catalog/book/not-an-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&app, &format!("/catalog/author/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&app, "/catalog/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_create_with_single_genre() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let genre = store.genres_list().await.unwrap().remove(0);

    let body = format!(
        "title=Dune&author={}&summary=Spice&isbn=9780441013593&genre={}",
        author.id, genre.id
    );
    let (status, location, _) = post_form(&app, "/catalog/book/create", &body).await;

    let books = store.books_list().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, Some(format!("/catalog/book/{}", books[0].id)));

    let book = store.books_get(books[0].id).await.unwrap().unwrap();
    assert_eq!(book.genre_ids, vec![genre.id]);
}

#[tokio::test]
async fn test_book_create_rerender_keeps_checked_genres() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let genres = store.genres_list().await.unwrap();

    let body = format!(
        "title=&author={}&summary=Spice&isbn=9780441013593&genre={}&genre={}",
        author.id, genres[0].id, genres[1].id
    );
    let (status, _, body) = post_form(&app, "/catalog/book/create", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Title must not be empty."));
    assert!(body.contains(&format!("value=\"{}\" checked", genres[0].id)));
    assert!(body.contains(&format!("value=\"{}\" checked", genres[1].id)));
    assert!(!body.contains(&format!("value=\"{}\" checked", genres[2].id)));
    assert!(body.contains(&format!("value=\"{}\" selected", author.id)));
    assert_eq!(store.books_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_book_update_preserves_id() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let other = add_author(&store, "Brian", "Herbert").await;
    let genres = store.genres_list().await.unwrap();
    let book = store
        .books_create(&NewBook {
            title: "Dune".to_string(),
            author_id: author.id,
            summary: "Spice".to_string(),
            isbn: "9780441013593".to_string(),
            genre_ids: vec![genres[0].id],
        })
        .await
        .unwrap();

    let uri = format!("/catalog/book/{}/update", book.id);
    let (status, _, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"Dune\""));
    assert!(body.contains(&format!("value=\"{}\" checked", genres[0].id)));

    let form = format!(
        "title=Dune+Messiah&author={}&summary=Sequel&isbn=9780441172696&genre={}&genre={}",
        other.id, genres[1].id, genres[2].id
    );
    let (status, location, _) = post_form(&app, &uri, &form).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, Some(format!("/catalog/book/{}", book.id)));
    let stored = store.books_get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune Messiah");
    assert_eq!(stored.author_id, other.id);
    assert_eq!(stored.summary, "Sequel");
    assert_eq!(stored.isbn, "9780441172696");
    let mut expected = vec![genres[1].id, genres[2].id];
    let mut stored_genres = stored.genre_ids.clone();
    expected.sort();
    stored_genres.sort();
    assert_eq!(stored_genres, expected);
    assert_eq!(store.books_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_book_update_rerenders_on_invalid_input() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;
    let genres = store.genres_list().await.unwrap();

    let form = format!(
        "title=&author={}&summary=Sequel&isbn=9780441172696&genre={}",
        author.id, genres[3].id
    );
    let (status, location, body) =
        post_form(&app, &format!("/catalog/book/{}/update", book.id), &form).await;

    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("<title>Update Book</title>"));
    assert!(body.contains("Title must not be empty."));
    assert!(body.contains(&format!("value=\"{}\" checked", genres[3].id)));
    assert!(!body.contains(&format!("value=\"{}\" checked", genres[0].id)));

    let stored = store.books_get(book.id).await.unwrap().unwrap();
    assert_eq!(stored, book);
}

#[tokio::test]
async fn test_book_delete_blocked_by_copies() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;
    add_copy(&store, &book, BookInstanceStatus::Available).await;

    let uri = format!("/catalog/book/{}/delete", book.id);
    let (status, _, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Delete the following copies"));

    let (status, _, body) = post_form(&app, &uri, &format!("bookid={}", book.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Delete the following copies"));
    assert!(store.books_get(book.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_book_delete_without_copies() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;

    let uri = format!("/catalog/book/{}/delete", book.id);
    let (status, _, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("name=\"bookid\" value=\"{}\"", book.id)));

    let (status, location, _) = post_form(&app, &uri, &format!("bookid={}", book.id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/books"));
    assert!(store.books_get(book.id).await.unwrap().is_none());

    // Already gone
    let (status, location, _) = post_form(&app, &uri, &format!("bookid={}", book.id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/books"));
}

#[tokio::test]
async fn test_book_delete_get_missing_redirects() {
    let (app, _) = app();
    let (status, location, _) =
        get(&app, &format!("/catalog/book/{}/delete", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/books"));
}

#[tokio::test]
async fn test_unimplemented_handlers() {
    let (app, _) = app();
    let id = Uuid::new_v4();

    let (status, _, body) = get(&app, &format!("/catalog/author/{}/delete", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "NOT IMPLEMENTED: Author delete GET");

    let (status, _, body) = post_form(&app, &format!("/catalog/author/{}/update", id), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "NOT IMPLEMENTED: Author update POST");

    let (_, _, body) = get(&app, &format!("/catalog/bookinstance/{}/update", id)).await;
    assert_eq!(body, "NOT IMPLEMENTED: BookInstance update GET");

    let (_, _, body) = post_form(&app, &format!("/catalog/bookinstance/{}/delete", id), "").await;
    assert_eq!(body, "NOT IMPLEMENTED: BookInstance delete POST");
}

#[tokio::test]
async fn test_copy_create_and_detail() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;

    let form = format!(
        "book={}&imprint=Ace%2C+1990&status=Loaned&due_back=2030-05-01",
        book.id
    );
    let (status, location, _) = post_form(&app, "/catalog/bookinstance/create", &form).await;

    let copies = store.book_instances_by_book(book.id).await.unwrap();
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].status, BookInstanceStatus::Loaned);
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, Some(format!("/catalog/bookinstance/{}", copies[0].id)));

    let (status, _, body) = get(&app, &format!("/catalog/bookinstance/{}", copies[0].id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Copy of Dune</title>"));
    assert!(body.contains("May 1, 2030"));
}

#[tokio::test]
async fn test_copy_create_rejects_unknown_status() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let book = add_book(&store, &author, "Dune").await;

    let form = format!("book={}&imprint=Ace&status=Lost", book.id);
    let (status, _, body) = post_form(&app, "/catalog/bookinstance/create", &form).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Invalid status"));
    assert!(body.contains(&format!("value=\"{}\" selected", book.id)));
    assert_eq!(store.book_instances_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_genre_pages() {
    let (app, store) = app();
    let author = add_author(&store, "Frank", "Herbert").await;
    let genre = store.genres_list().await.unwrap().remove(0);
    store
        .books_create(&NewBook {
            title: "Dune".to_string(),
            author_id: author.id,
            summary: "Spice".to_string(),
            isbn: "9780441013593".to_string(),
            genre_ids: vec![genre.id],
        })
        .await
        .unwrap();

    let (status, _, body) = get(&app, "/catalog/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&genre.name));

    let (status, _, body) = get(&app, &format!("/catalog/genre/{}", genre.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Dune"));
}
