//! Repository layer for catalog records
//!
//! Typed access to the document store. Reference population is always an
//! explicit argument so each call states which collections it touches.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::Document,
    store::{DocumentStore, Filter, Query, StoredDocument},
};

pub use book_instances::BookInstanceRef;
pub use books::BookRef;

/// Per-collection repositories over one store
#[derive(Clone)]
pub struct Repository {
    pub authors: authors::AuthorsRepository,
    pub genres: genres::GenresRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(store.clone()),
            genres: genres::GenresRepository::new(store.clone()),
            books: books::BooksRepository::new(store.clone()),
            book_instances: book_instances::BookInstancesRepository::new(store),
        }
    }
}

/// One collection of typed documents
pub struct Documents<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Documents<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Documents<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn decode(doc: StoredDocument) -> AppResult<T> {
        let fields: T::Fields = serde_json::from_value(doc.body)?;
        Ok(T::from_parts(doc.id, fields))
    }

    pub async fn find(&self, query: &Query) -> AppResult<Vec<T>> {
        self.store
            .find(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Missing ids yield `None`, not an error
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Resolve a batch of references in one round trip
    pub async fn find_by_ids(&self, ids: impl IntoIterator<Item = Uuid>) -> AppResult<HashMap<Uuid, T>> {
        let unique: HashSet<Uuid> = ids.into_iter().collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = unique.into_iter().collect();
        self.store
            .find_by_ids(T::COLLECTION, &ids)
            .await?
            .into_iter()
            .map(|doc| Self::decode(doc).map(|record| (record.id(), record)))
            .collect()
    }

    pub async fn find_one(&self, filter: Filter) -> AppResult<Option<T>> {
        Ok(self.find(&Query::new(filter)).await?.into_iter().next())
    }

    pub async fn count(&self, filter: &Filter) -> AppResult<i64> {
        self.store.count(T::COLLECTION, filter).await
    }

    /// Check schema constraints, then insert
    pub async fn create(&self, fields: T::Fields) -> AppResult<T> {
        fields.validate()?;
        let body = serde_json::to_value(&fields)?;
        let id = self.store.insert(T::COLLECTION, body).await?;
        Ok(T::from_parts(id, fields))
    }

    /// Replace the whole record. `None` when the id does not exist.
    pub async fn update(&self, id: Uuid, fields: T::Fields) -> AppResult<Option<T>> {
        fields.validate()?;
        let body = serde_json::to_value(&fields)?;
        if self.store.replace(T::COLLECTION, id, body).await? {
            Ok(Some(T::from_parts(id, fields)))
        } else {
            Ok(None)
        }
    }

    /// `false` when the record was already gone
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{Genre, GenreFields},
        store::MemoryStore,
    };

    fn genres() -> Documents<Genre> {
        Documents::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_rejects_schema_violation() {
        let docs = genres();
        let err = docs
            .create(GenreFields { name: "SF".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(docs.count(&Filter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_none() {
        let docs = genres();
        let updated = docs
            .update(Uuid::new_v4(), GenreFields { name: "Fantasy".to_string() })
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_find_by_ids_deduplicates() {
        let docs = genres();
        let genre = docs
            .create(GenreFields { name: "Fantasy".to_string() })
            .await
            .unwrap();

        let found = docs.find_by_ids([genre.id, genre.id]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&genre.id].name, "Fantasy");
        assert!(docs.find_by_ids(Vec::new()).await.unwrap().is_empty());
    }
}
