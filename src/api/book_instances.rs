//! Book instance (copy) pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{not_found, page, RecordId, SubmittedForm};
use crate::{
    error::AppResult,
    models::{BookInstanceStatus, PopulatedBook, PopulatedBookInstance},
    validation::{forms, FormData, ValidationErrors},
    AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";

fn render_form(
    state: &AppState,
    title: &str,
    books: &[PopulatedBook],
    form: &FormData,
    errors: &ValidationErrors,
) -> AppResult<Html<String>> {
    let books: Vec<_> = books.iter().map(PopulatedBook::view).collect();
    let statuses: Vec<_> = BookInstanceStatus::ALL.iter().map(|s| s.as_str()).collect();

    let mut context = page(title);
    context.insert("books", &books);
    context.insert("statuses", &statuses);
    context.insert("form", form);
    context.insert("errors", errors);
    state.views.render("bookinstance_form.html", &context)
}

/// Every copy with its book
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let instances: Vec<_> = state
        .services
        .book_instances
        .list()
        .await?
        .iter()
        .map(PopulatedBookInstance::view)
        .collect();

    let mut context = page("Book Instance List");
    context.insert("instances", &instances);
    state.views.render("bookinstance_list.html", &context)
}

pub async fn detail(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let instance = state
        .services
        .book_instances
        .detail(id)
        .await?
        .ok_or_else(|| not_found("Book copy"))?;

    let mut context = page("Book Instance Detail");
    context.insert("instance", &instance.view());
    state.views.render("bookinstance_detail.html", &context)
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.book_instances.form_options().await?;
    render_form(
        &state,
        "Create BookInstance",
        &books,
        &FormData::new(),
        &ValidationErrors::new(),
    )
}

pub async fn create(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::book_instance(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            let books = state.services.book_instances.form_options().await?;
            return Ok(render_form(
                &state,
                "Create BookInstance",
                &books,
                &rejected.form,
                &rejected.errors,
            )?
            .into_response());
        }
    };

    let instance = state.services.book_instances.create(fields).await?;
    Ok(Redirect::to(&instance.url()).into_response())
}

pub async fn update_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Html<String>> {
    let (instance, books) = tokio::try_join!(
        state.services.book_instances.get(id),
        state.services.book_instances.form_options(),
    )?;
    let instance = instance.ok_or_else(|| not_found("Book copy"))?;

    render_form(
        &state,
        "Update BookInstance",
        &books,
        &FormData::from(&instance),
        &ValidationErrors::new(),
    )
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    SubmittedForm(form): SubmittedForm,
) -> AppResult<Response> {
    let fields = match forms::book_instance(form) {
        Ok(fields) => fields,
        Err(rejected) => {
            let books = state.services.book_instances.form_options().await?;
            return Ok(render_form(
                &state,
                "Update BookInstance",
                &books,
                &rejected.form,
                &rejected.errors,
            )?
            .into_response());
        }
    };

    let instance = state.services.book_instances.update(id, fields).await?;
    Ok(Redirect::to(&instance.url()).into_response())
}

pub async fn delete_form(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    let Some(instance) = state.services.book_instances.detail(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let mut context = page("Delete BookInstance");
    context.insert("instance", &instance.view());
    Ok(state
        .views
        .render("bookinstance_delete.html", &context)?
        .into_response())
}

pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> AppResult<Response> {
    state.services.book_instances.delete(id).await?;
    Ok(Redirect::to(LIST_URL).into_response())
}
