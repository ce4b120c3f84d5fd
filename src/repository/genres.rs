//! Genres repository

use std::sync::Arc;

use uuid::Uuid;

use super::Documents;
use crate::{
    error::AppResult,
    models::{Genre, GenreFields},
    store::{DocumentStore, Filter, Query, Sort},
};

#[derive(Clone)]
pub struct GenresRepository {
    docs: Documents<Genre>,
}

impl GenresRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Documents::new(store),
        }
    }

    /// All genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.docs.find(&Query::default().sorted(Sort::asc("name"))).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.docs.find_by_id(id).await
    }

    /// Natural key lookup, case-insensitive
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        self.docs
            .find_one(Filter::all().eq_ignore_case("name", name))
            .await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.docs.count(&Filter::all()).await
    }

    pub async fn create(&self, fields: GenreFields) -> AppResult<Genre> {
        self.docs.create(fields).await
    }

    pub async fn update(&self, id: Uuid, fields: GenreFields) -> AppResult<Option<Genre>> {
        self.docs.update(id, fields).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.docs.delete(id).await
    }
}
