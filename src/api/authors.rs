//! Author pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{not_found, page, RecordId, SubmittedForm};
use crate::{
    error::AppResult,
    models::{Author, Book},
    services::{authors::AuthorDetail, Deletion},
    validation::{forms, FormData, ValidationErrors},
    AppState,
};

const LIST_URL: &str = "/catalog/authors";

fn render_form(
    state: &AppState,
    title: &str,
    form: &FormData,
    errors: &ValidationErrors,
) -> AppResult<Html<String>> {
    let mut context = page(title);
    context.insert("form", form);
    context.insert("errors", errors);
    state.views.render("author_form.html", &context)
}

fn render_delete(state: &AppState, detail: &AuthorDetail) -> AppResult<Html<String>> {
    let books: Vec<_> = detail.books.iter().map(Book::view).collect();
    let mut context = page("Delete Author");
    context.insert("author", &detail.author.view());
    context.insert("books", &books);
    state.views.render("author_delete.html", &context)
}

/// All authors by family name
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors: Vec<_> = state.services.authors.list().await?.iter().map(Author::view).collect();

    let mut context = page("Author List");
    context.insert("authors", &authors);
    state.views.render("author_list.html", &context)
}

pub async fn detail(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let detail = state
        .services
        .authors
        .detail(id)
        .await?
        .ok_or_else(|| not_found("Author"))?;
    let books: Vec<_> = detail.books.iter().map(Book::view).collect();

    let mut context = page("Author Detail");
    context.insert("author", &detail.author.view());
    context.insert("books", &books);
    state.views.render("author_detail.html", &context)
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, "Create Author", &FormData::new(), &ValidationErrors::new())
}

pub async fn create(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::author(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            return Ok(render_form(&state, "Create Author", &rejected.form, &rejected.errors)?.into_response())
        }
    };

    let created = state.services.authors.create(fields).await?;
    Ok(Redirect::to(&created.record().url()).into_response())
}

pub async fn update_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let author = state
        .services
        .authors
        .get(id)
        .await?
        .ok_or_else(|| not_found("Author"))?;
    render_form(&state, "Update Author", &FormData::from(&author), &ValidationErrors::new())
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::author(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            return Ok(render_form(&state, "Update Author", &rejected.form, &rejected.errors)?.into_response())
        }
    };

    let author = state.services.authors.update(id, fields).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

pub async fn delete_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.authors.detail(id).await? {
        Some(detail) => Ok(render_delete(&state, &detail)?.into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.authors.delete(id).await? {
        Deletion::Blocked(detail) => Ok(render_delete(&state, &detail)?.into_response()),
        Deletion::Deleted | Deletion::AlreadyGone => Ok(Redirect::to(LIST_URL).into_response()),
    }
}
