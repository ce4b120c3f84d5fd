//! Book instances service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceFields, PopulatedBook, PopulatedBookInstance},
    repository::{BookInstanceRef, Repository},
    store::Filter,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies in insertion order, with their book
    pub async fn list(&self) -> AppResult<Vec<PopulatedBookInstance>> {
        self.repository
            .book_instances
            .find_all(Filter::all(), None, &[BookInstanceRef::Book])
            .await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self
            .repository
            .book_instances
            .find_by_id(id, &[])
            .await?
            .map(|populated| populated.instance))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Option<PopulatedBookInstance>> {
        self.repository
            .book_instances
            .find_by_id(id, &[BookInstanceRef::Book])
            .await
    }

    /// Books offered by the copy form, by title
    pub async fn form_options(&self) -> AppResult<Vec<PopulatedBook>> {
        self.repository.books.list(&[]).await
    }

    /// Copies have no natural key and are always stored
    pub async fn create(&self, fields: BookInstanceFields) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.create(fields).await?;
        tracing::info!(
            "Created book instance id={} for book id={}",
            instance.id,
            instance.book
        );
        Ok(instance)
    }

    pub async fn update(&self, id: Uuid, fields: BookInstanceFields) -> AppResult<BookInstance> {
        let instance = self
            .repository
            .book_instances
            .update(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        tracing::info!("Updated book instance id={}", instance.id);
        Ok(instance)
    }

    /// Nothing references a copy, so a present copy is always removed.
    /// `false` when it was already gone.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.repository.book_instances.delete(id).await?;
        if deleted {
            tracing::info!("Deleted book instance id={}", id);
        }
        Ok(deleted)
    }
}
