//! Genres service

use uuid::Uuid;

use super::{Created, Deletion};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreFields},
    repository::Repository,
};

/// A genre with the books filed under it
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.repository.genres.find_by_id(id).await
    }

    /// Genre and its books, loaded concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.by_genre(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    /// Create unless a genre with the same name (any case) exists
    pub async fn create(&self, fields: GenreFields) -> AppResult<Created<Genre>> {
        if let Some(existing) = self.repository.genres.find_by_name(&fields.name).await? {
            tracing::info!("Genre '{}' already exists as id={}", fields.name, existing.id);
            return Ok(Created::Existing(existing));
        }

        let genre = self.repository.genres.create(fields).await?;
        tracing::info!("Created genre id={} name='{}'", genre.id, genre.name);
        Ok(Created::New(genre))
    }

    pub async fn update(&self, id: Uuid, fields: GenreFields) -> AppResult<Genre> {
        let genre = self
            .repository
            .genres
            .update(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        tracing::info!("Updated genre id={}", genre.id);
        Ok(genre)
    }

    /// Remove the genre unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<GenreDetail>> {
        let Some(detail) = self.detail(id).await? else {
            return Ok(Deletion::AlreadyGone);
        };
        if !detail.books.is_empty() {
            tracing::info!(
                "Genre id={} not deleted: {} book(s) reference it",
                id,
                detail.books.len()
            );
            return Ok(Deletion::Blocked(detail));
        }

        self.repository.genres.delete(id).await?;
        tracing::info!("Deleted genre id={}", id);
        Ok(Deletion::Deleted)
    }
}
