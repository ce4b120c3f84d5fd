//! Local Library catalog server
//!
//! Server-rendered pages for browsing and editing a small library catalog:
//! authors, genres, books and the physical copies of each book.

use std::sync::Arc;

use axum::{
    middleware,
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub views: Arc<views::Views>,
    pub store: Arc<dyn store::DocumentStore>,
}

impl AppState {
    /// Wire repository, services and views over an open store
    pub fn new(config: AppConfig, store: Arc<dyn store::DocumentStore>) -> AppResult<Self> {
        let repository = repository::Repository::new(store.clone());
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            views: Arc::new(views::Views::new()?),
            store,
        })
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let catalog = Router::new()
        // Books
        .route("/books", get(api::books::list))
        .route("/book/create", get(api::books::create_form).post(api::books::create))
        .route("/book/:id", get(api::books::detail))
        .route("/book/:id/update", get(api::books::update_form).post(api::books::update))
        .route("/book/:id/delete", get(api::books::delete_form).post(api::books::delete))
        // Authors
        .route("/authors", get(api::authors::list))
        .route("/author/create", get(api::authors::create_form).post(api::authors::create))
        .route("/author/:id", get(api::authors::detail))
        .route("/author/:id/update", get(api::authors::update_form).post(api::authors::update))
        .route("/author/:id/delete", get(api::authors::delete_form).post(api::authors::delete))
        // Genres
        .route("/genres", get(api::genres::list))
        .route("/genre/create", get(api::genres::create_form).post(api::genres::create))
        .route("/genre/:id", get(api::genres::detail))
        .route("/genre/:id/update", get(api::genres::update_form).post(api::genres::update))
        .route("/genre/:id/delete", get(api::genres::delete_form).post(api::genres::delete))
        // Book instances
        .route("/bookinstances", get(api::book_instances::list))
        .route(
            "/bookinstance/create",
            get(api::book_instances::create_form).post(api::book_instances::create),
        )
        .route("/bookinstance/:id", get(api::book_instances::detail))
        .route(
            "/bookinstance/:id/update",
            get(api::book_instances::update_form).post(api::book_instances::update),
        )
        .route(
            "/bookinstance/:id/delete",
            get(api::book_instances::delete_form).post(api::book_instances::delete),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/catalog", get(api::dashboard::index))
        .nest("/catalog", catalog)
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .nest_service("/public", ServeDir::new(&state.config.server.static_dir))
        .fallback(api::fallback)
        .layer(middleware::from_fn_with_state(state.clone(), api::error_pages))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
