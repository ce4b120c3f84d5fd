//! Genre pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{not_found, page, RecordId, SubmittedForm};
use crate::{
    error::AppResult,
    models::{Book, Genre},
    services::{genres::GenreDetail, Deletion},
    validation::{forms, FormData, ValidationErrors},
    AppState,
};

const LIST_URL: &str = "/catalog/genres";

fn render_form(
    state: &AppState,
    title: &str,
    form: &FormData,
    errors: &ValidationErrors,
) -> AppResult<Html<String>> {
    let mut context = page(title);
    context.insert("form", form);
    context.insert("errors", errors);
    state.views.render("genre_form.html", &context)
}

fn render_delete(state: &AppState, detail: &GenreDetail) -> AppResult<Html<String>> {
    let books: Vec<_> = detail.books.iter().map(Book::view).collect();
    let mut context = page("Delete Genre");
    context.insert("genre", &detail.genre.view());
    context.insert("books", &books);
    state.views.render("genre_delete.html", &context)
}

/// All genres by name
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let genres: Vec<_> = state.services.genres.list().await?.iter().map(Genre::view).collect();

    let mut context = page("Genre List");
    context.insert("genres", &genres);
    state.views.render("genre_list.html", &context)
}

pub async fn detail(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let detail = state
        .services
        .genres
        .detail(id)
        .await?
        .ok_or_else(|| not_found("Genre"))?;
    let books: Vec<_> = detail.books.iter().map(Book::view).collect();

    let mut context = page("Genre Detail");
    context.insert("genre", &detail.genre.view());
    context.insert("books", &books);
    state.views.render("genre_detail.html", &context)
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, "Create Genre", &FormData::new(), &ValidationErrors::new())
}

pub async fn create(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::genre(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            return Ok(render_form(&state, "Create Genre", &rejected.form, &rejected.errors)?.into_response())
        }
    };

    let created = state.services.genres.create(fields).await?;
    Ok(Redirect::to(&created.record().url()).into_response())
}

pub async fn update_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let genre = state
        .services
        .genres
        .get(id)
        .await?
        .ok_or_else(|| not_found("Genre"))?;
    render_form(&state, "Update Genre", &FormData::from(&genre), &ValidationErrors::new())
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::genre(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            return Ok(render_form(&state, "Update Genre", &rejected.form, &rejected.errors)?.into_response())
        }
    };

    let genre = state.services.genres.update(id, fields).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

pub async fn delete_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.genres.detail(id).await? {
        Some(detail) => Ok(render_delete(&state, &detail)?.into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    match state.services.genres.delete(id).await? {
        Deletion::Blocked(detail) => Ok(render_delete(&state, &detail)?.into_response()),
        Deletion::Deleted | Deletion::AlreadyGone => Ok(Redirect::to(LIST_URL).into_response()),
    }
}
