//! Error types for the Local Library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// A write that breaks a schema constraint
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Serialization(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error details attached to a response for the error-page middleware to render
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
    /// Full diagnostic, only shown in development mode
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            AppError::Validation(msg) => tracing::warn!("Schema validation failed: {}", msg),
            other => tracing::error!("Request failed: {:?}", other),
        }

        let page = ErrorPage {
            status,
            message: self.to_string(),
            detail: format!("{:#?}", self),
        };

        let mut response = status.into_response();
        response.extensions_mut().insert(page);
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::NotFound("Book not found".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Book not found");
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let err = AppError::Internal("store lock poisoned".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_attaches_error_page() {
        let response = AppError::NotFound("Genre not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let page = response
            .extensions()
            .get::<ErrorPage>()
            .expect("error page extension");
        assert_eq!(page.message, "Genre not found");
        assert!(page.detail.contains("NotFound"));
    }
}
