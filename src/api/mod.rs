//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod dashboard;
pub mod genres;
pub mod health;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Form,
};
use tera::Context;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorPage},
    validation::{rules::escape, FormData},
    AppState,
};

/// Record id taken from the `:id` path segment. An id that does not parse
/// cannot name a stored record, so it is rejected as not found.
pub struct RecordId(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Not Found".to_string()))?;

        Uuid::parse_str(&raw)
            .map(RecordId)
            .map_err(|_| AppError::NotFound("Not Found".to_string()))
    }
}

/// A url-encoded form body, repeated keys preserved
pub struct SubmittedForm(pub FormData);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for SubmittedForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(SubmittedForm(FormData::from_pairs(pairs)))
    }
}

/// Base context every page template expects
pub(crate) fn page(title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{} not found", what))
}

/// Fallback for unmatched routes
pub async fn fallback() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Render error responses into the shared error page. The diagnostic is
/// only included in development mode.
pub async fn error_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(error) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let detail = if state.config.is_development() {
        error.detail
    } else {
        String::new()
    };
    let mut context = page("Error");
    context.insert("message", &error.message);
    context.insert("status", &error.status.as_u16());
    context.insert("detail", &detail);

    match state.views.render("error.html", &context) {
        Ok(html) => (error.status, html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (error.status, Html(escape(&error.message))).into_response()
        }
    }
}
