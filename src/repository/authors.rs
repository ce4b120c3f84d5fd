//! Authors repository

use std::sync::Arc;

use uuid::Uuid;

use super::Documents;
use crate::{
    error::AppResult,
    models::{Author, AuthorFields},
    store::{DocumentStore, Filter, Query, Sort},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    docs: Documents<Author>,
}

impl AuthorsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Documents::new(store),
        }
    }

    /// All authors ordered by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.docs
            .find(&Query::default().sorted(Sort::asc("family_name")))
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.docs.find_by_id(id).await
    }

    /// Natural key lookup: same first and family name
    pub async fn find_by_name(&self, first_name: &str, family_name: &str) -> AppResult<Option<Author>> {
        self.docs
            .find_one(
                Filter::all()
                    .eq("first_name", first_name)
                    .eq("family_name", family_name),
            )
            .await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.docs.count(&Filter::all()).await
    }

    pub async fn create(&self, fields: AuthorFields) -> AppResult<Author> {
        self.docs.create(fields).await
    }

    pub async fn update(&self, id: Uuid, fields: AuthorFields) -> AppResult<Option<Author>> {
        self.docs.update(id, fields).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.docs.delete(id).await
    }
}
