//! Catalog page integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use local_library::{config::AppConfig, create_router, store::MemoryStore, AppState};

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryStore::new()))
        .expect("Failed to build state");
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().expect("ascii location").to_string());
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    Reply {
        status,
        location,
        body: String::from_utf8(body.to_vec()).expect("utf-8 body"),
    }
}

async fn get(app: &Router, uri: &str) -> Reply {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// POST an already url-encoded form body
async fn post(app: &Router, uri: &str, form: &str) -> Reply {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// Create through the form and return the new record's path
async fn create(app: &Router, uri: &str, form: &str) -> String {
    let reply = post(app, uri, form).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "create failed: {}", reply.body);
    reply.location.expect("redirect location")
}

fn id_of(path: &str) -> &str {
    path.rsplit('/').next().expect("id segment")
}

#[tokio::test]
async fn test_health_check() {
    let reply = get(&app(), "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("\"status\":\"healthy\""));

    let reply = get(&app(), "/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let reply = get(&app(), "/").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let reply = get(&app(), "/catalog/nowhere/at/all").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.contains("Not Found"));
}

#[tokio::test]
async fn test_genre_create_redirects_and_lists_alphabetically() {
    let app = app();
    create(&app, "/catalog/genre/create", "name=Fantasy").await;
    create(&app, "/catalog/genre/create", "name=Comedy").await;
    let drama = create(&app, "/catalog/genre/create", "name=Drama").await;

    assert!(drama.starts_with("/catalog/genre/"));
    assert!(Uuid::parse_str(id_of(&drama)).is_ok());

    let detail = get(&app, &drama).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Genre: Drama"));

    let list = get(&app, "/catalog/genres").await.body;
    let comedy = list.find(">Comedy<").unwrap();
    let drama = list.find(">Drama<").unwrap();
    let fantasy = list.find(">Fantasy<").unwrap();
    assert!(comedy < drama && drama < fantasy);
}

#[tokio::test]
async fn test_duplicate_genre_redirects_to_existing() {
    let app = app();
    let first = create(&app, "/catalog/genre/create", "name=Fantasy").await;
    let second = create(&app, "/catalog/genre/create", "name=Fantasy").await;

    assert_eq!(first, second);
    let list = get(&app, "/catalog/genres").await.body;
    assert_eq!(list.matches(">Fantasy<").count(), 1);
}

#[tokio::test]
async fn test_short_genre_name_rerenders_form() {
    let app = app();
    let reply = post(&app, "/catalog/genre/create", "name=ab").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name must contain at least 3 characters"));
    assert!(reply.body.contains("value=\"ab\""));
    assert!(get(&app, "/catalog/genres").await.body.contains("There are no genres."));
}

#[tokio::test]
async fn test_author_with_symbols_in_name_is_rejected() {
    let app = app();
    let reply = post(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=As1m0v%23%21&date_of_birth=&date_of_death=",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Family name has non-alphanumeric characters."));
    assert!(get(&app, "/catalog/authors").await.body.contains("There are no authors."));
}

#[tokio::test]
async fn test_author_detail_url_and_lifespan() {
    let app = app();
    let path = create(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=Asimov&date_of_birth=1920-01-02&date_of_death=1992-04-06",
    )
    .await;

    assert_eq!(path, format!("/catalog/author/{}", id_of(&path)));
    let detail = get(&app, &path).await.body;
    assert!(detail.contains("Author: Asimov, Isaac"));
    assert!(detail.contains("Jan 2, 1920 - Apr 6, 1992"));
}

#[tokio::test]
async fn test_book_without_title_keeps_entered_values() {
    let app = app();
    let author = create(&app, "/catalog/author/create", "first_name=Ben&family_name=Bova").await;
    let author_id = id_of(&author);

    let reply = post(
        &app,
        "/catalog/book/create",
        &format!("title=&author={}&summary=Gamma+ray+burst&isbn=9780765379528", author_id),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Title must not be empty."));
    assert!(reply.body.contains("Gamma ray burst"));
    assert!(reply.body.contains("value=\"9780765379528\""));
    assert!(reply
        .body
        .contains(&format!("<option value=\"{}\" selected>", author_id)));
    assert!(get(&app, "/catalog/books").await.body.contains("There are no books."));
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let app = app();
    let reply = get(&app, &format!("/catalog/book/{}", Uuid::new_v4())).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.contains("Book not found"));
}

#[tokio::test]
async fn test_genre_delete_blocked_until_books_are_gone() {
    let app = app();
    let genre = create(&app, "/catalog/genre/create", "name=Poetry").await;
    let author = create(&app, "/catalog/author/create", "first_name=Jim&family_name=Jones").await;
    let book = create(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Verses&author={}&summary=Poems&isbn=ISBN111111&genre={}",
            id_of(&author),
            id_of(&genre)
        ),
    )
    .await;

    let warning = get(&app, &format!("{}/delete", genre)).await;
    assert!(warning.body.contains("Delete the following books"));

    let blocked = post(&app, &format!("{}/delete", genre), "").await;
    assert_eq!(blocked.status, StatusCode::OK);
    assert!(blocked.body.contains("Delete the following books"));
    assert!(blocked.body.contains("Verses"));
    assert_eq!(get(&app, &genre).await.status, StatusCode::OK);

    let deleted = post(&app, &format!("{}/delete", book), "").await;
    assert_eq!(deleted.location.as_deref(), Some("/catalog/books"));

    let confirm = get(&app, &format!("{}/delete", genre)).await;
    assert!(confirm.body.contains("Do you really want to delete this Genre?"));

    let reply = post(&app, &format!("{}/delete", genre), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));
    assert!(!get(&app, "/catalog/genres").await.body.contains("Poetry"));

    // already gone: both forms of delete fall back to the list
    let again = post(&app, &format!("{}/delete", genre), "").await;
    assert_eq!(again.location.as_deref(), Some("/catalog/genres"));
    let gone = get(&app, &format!("{}/delete", genre)).await;
    assert_eq!(gone.location.as_deref(), Some("/catalog/genres"));
}

#[tokio::test]
async fn test_book_update_prefills_and_replaces() {
    let app = app();
    let author = create(&app, "/catalog/author/create", "first_name=Patrick&family_name=Rothfuss").await;
    let genre = create(&app, "/catalog/genre/create", "name=Fantasy").await;
    let book = create(
        &app,
        "/catalog/book/create",
        &format!(
            "title=The+Name+of+the+Wind&author={}&summary=Kvothe&isbn=9781473211896&genre={}",
            id_of(&author),
            id_of(&genre)
        ),
    )
    .await;

    let form = get(&app, &format!("{}/update", book)).await.body;
    assert!(form.contains("value=\"The Name of the Wind\""));
    assert!(form.contains(&format!("<option value=\"{}\" selected>", id_of(&author))));
    assert!(form.contains(&format!("value=\"{}\" checked>", id_of(&genre))));

    let reply = post(
        &app,
        &format!("{}/update", book),
        &format!(
            "title=The+Wise+Man%27s+Fear&author={}&summary=Kvothe+again&isbn=9788401352836",
            id_of(&author)
        ),
    )
    .await;
    assert_eq!(reply.location.as_deref(), Some(book.as_str()));

    let detail = get(&app, &book).await.body;
    assert!(detail.contains("The Wise Man&#x27;s Fear"));
    assert!(!detail.contains(&format!("/catalog/genre/{}", id_of(&genre))));

    let missing = post(
        &app,
        &format!("/catalog/book/{}/update", Uuid::new_v4()),
        &format!("title=X&author={}&summary=S&isbn=I", id_of(&author)),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_instance_defaults_and_dashboard_counts() {
    let app = app();
    let author = create(&app, "/catalog/author/create", "first_name=Ben&family_name=Bova").await;
    let book = create(
        &app,
        "/catalog/book/create",
        &format!("title=Death+Wave&author={}&summary=Radiation&isbn=9780765379504", id_of(&author)),
    )
    .await;

    let copy = create(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Tor%2C+2015.&status=&due_back=", id_of(&book)),
    )
    .await;
    create(
        &app,
        "/catalog/bookinstance/create",
        &format!(
            "book={}&imprint=Tor%2C+2015.&status=Available&due_back=2024-06-01",
            id_of(&book)
        ),
    )
    .await;

    let detail = get(&app, &copy).await.body;
    assert!(detail.contains("Maintenance"));
    assert!(detail.contains("Death Wave"));

    let invalid = post(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Tor&status=Lost", id_of(&book)),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert!(invalid.body.contains("Invalid status"));

    let home = get(&app, "/catalog").await.body;
    assert!(home.contains("<strong>Books:</strong> 1"));
    assert!(home.contains("<strong>Copies:</strong> 2"));
    assert!(home.contains("<strong>Copies available:</strong> 1"));
    assert!(home.contains("<strong>Authors:</strong> 1"));
    assert!(home.contains("<strong>Genres:</strong> 0"));

    let blocked = post(&app, &format!("{}/delete", book), "").await;
    assert!(blocked.body.contains("Delete the following copies"));
}
