//! Book pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{not_found, page, RecordId, SubmittedForm};
use crate::{
    error::AppResult,
    models::{Author, BookInstance, Genre, PopulatedBook},
    services::{
        books::{BookDetail, BookFormOptions},
        Deletion,
    },
    validation::{forms, FormData, ValidationErrors},
    AppState,
};

const LIST_URL: &str = "/catalog/books";

fn render_form(
    state: &AppState,
    title: &str,
    options: &BookFormOptions,
    form: &FormData,
    errors: &ValidationErrors,
) -> AppResult<Html<String>> {
    let authors: Vec<_> = options.authors.iter().map(Author::view).collect();
    let genres: Vec<_> = options.genres.iter().map(Genre::view).collect();

    let mut context = page(title);
    context.insert("authors", &authors);
    context.insert("genres", &genres);
    context.insert("form", form);
    context.insert("errors", errors);
    state.views.render("book_form.html", &context)
}

fn detail_context(title: &str, detail: &BookDetail) -> tera::Context {
    let instances: Vec<_> = detail.instances.iter().map(BookInstance::view).collect();
    let mut context = page(title);
    context.insert("book", &detail.book.view());
    context.insert("instances", &instances);
    context
}

/// All books by title, with their author
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books: Vec<_> = state
        .services
        .books
        .list()
        .await?
        .iter()
        .map(PopulatedBook::view)
        .collect();

    let mut context = page("Book List");
    context.insert("books", &books);
    state.views.render("book_list.html", &context)
}

pub async fn detail(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let detail = state
        .services
        .books
        .detail(id)
        .await?
        .ok_or_else(|| not_found("Book"))?;
    state
        .views
        .render("book_detail.html", &detail_context("Book Detail", &detail))
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let options = state.services.books.form_options().await?;
    render_form(&state, "Create Book", &options, &FormData::new(), &ValidationErrors::new())
}

pub async fn create(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::book(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            let options = state.services.books.form_options().await?;
            return Ok(
                render_form(&state, "Create Book", &options, &rejected.form, &rejected.errors)?
                    .into_response(),
            );
        }
    };

    let created = state.services.books.create(fields).await?;
    Ok(Redirect::to(&created.record().url()).into_response())
}

/// Edit form pre-filled with the stored book; its author and genre come
/// out selected because the form values carry their ids.
pub async fn update_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let (book, options) = tokio::try_join!(
        state.services.books.get(id),
        state.services.books.form_options(),
    )?;
    let book = book.ok_or_else(|| not_found("Book"))?;

    render_form(
        &state,
        "Update Book",
        &options,
        &FormData::from(&book),
        &ValidationErrors::new(),
    )
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::book(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            let options = state.services.books.form_options().await?;
            return Ok(
                render_form(&state, "Update Book", &options, &rejected.form, &rejected.errors)?
                    .into_response(),
            );
        }
    };

    let book = state.services.books.update(id, fields).await?;
    Ok(Redirect::to(&book.url()).into_response())
}

pub async fn delete_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.books.detail(id).await? {
        Some(detail) => {
            let html = state
                .views
                .render("book_delete.html", &detail_context("Delete Book", &detail))?;
            Ok(html.into_response())
        }
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.books.delete(id).await? {
        Deletion::Blocked(detail) => {
            let html = state
                .views
                .render("book_delete.html", &detail_context("Delete Book", &detail))?;
            Ok(html.into_response())
        }
        Deletion::Deleted | Deletion::AlreadyGone => Ok(Redirect::to(LIST_URL).into_response()),
    }
}
