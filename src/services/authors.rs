//! Authors service

use uuid::Uuid;

use super::{Created, Deletion};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorFields, Book},
    repository::Repository,
};

/// An author with their books
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.repository.authors.find_by_id(id).await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.by_author(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    /// Create unless an author with the same first and family name exists
    pub async fn create(&self, fields: AuthorFields) -> AppResult<Created<Author>> {
        let existing = self
            .repository
            .authors
            .find_by_name(&fields.first_name, &fields.family_name)
            .await?;
        if let Some(existing) = existing {
            tracing::info!("Author '{}' already exists as id={}", existing.name(), existing.id);
            return Ok(Created::Existing(existing));
        }

        let author = self.repository.authors.create(fields).await?;
        tracing::info!("Created author id={} name='{}'", author.id, author.name());
        Ok(Created::New(author))
    }

    pub async fn update(&self, id: Uuid, fields: AuthorFields) -> AppResult<Author> {
        let author = self
            .repository
            .authors
            .update(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        tracing::info!("Updated author id={}", author.id);
        Ok(author)
    }

    /// Remove the author unless books still reference them
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<AuthorDetail>> {
        let Some(detail) = self.detail(id).await? else {
            return Ok(Deletion::AlreadyGone);
        };
        if !detail.books.is_empty() {
            tracing::info!(
                "Author id={} not deleted: {} book(s) reference it",
                id,
                detail.books.len()
            );
            return Ok(Deletion::Blocked(detail));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(Deletion::Deleted)
    }
}
