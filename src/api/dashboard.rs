//! Catalog home page

use axum::{extract::State, response::Html};

use super::page;
use crate::{error::AppResult, AppState};

/// Record counts across the catalog
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let counts = state.services.dashboard.counts().await?;

    let mut context = page("Local Library Home");
    context.insert("counts", &counts);
    state.views.render("index.html", &context)
}
