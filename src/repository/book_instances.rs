//! Book instances repository

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Documents;
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceFields, BookInstanceStatus, PopulatedBookInstance},
    store::{DocumentStore, Filter, Query, Sort},
};

/// Reference fields of a copy that can be resolved on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookInstanceRef {
    Book,
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    docs: Documents<BookInstance>,
    books: Documents<Book>,
    /// Due date given to copies saved without one; fixed when the repository is built
    default_due_back: DateTime<Utc>,
}

impl BookInstancesRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Documents::new(store.clone()),
            books: Documents::new(store),
            default_due_back: Utc::now(),
        }
    }

    pub fn default_due_back(&self) -> DateTime<Utc> {
        self.default_due_back
    }

    pub async fn find_all(
        &self,
        filter: Filter,
        sort: Option<Sort>,
        populate: &[BookInstanceRef],
    ) -> AppResult<Vec<PopulatedBookInstance>> {
        let instances = self.docs.find(&Query { filter, sort }).await?;
        self.populate(instances, populate).await
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        populate: &[BookInstanceRef],
    ) -> AppResult<Option<PopulatedBookInstance>> {
        let Some(instance) = self.docs.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.populate(vec![instance], populate).await?.pop())
    }

    /// Copies of one book, in insertion order
    pub async fn by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.docs
            .find(&Query::new(Filter::all().eq("book", book_id.to_string())))
            .await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.docs.count(&Filter::all()).await
    }

    pub async fn count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        self.docs
            .count(&Filter::all().eq("status", status.as_str()))
            .await
    }

    pub async fn create(&self, fields: BookInstanceFields) -> AppResult<BookInstance> {
        self.docs.create(self.with_defaults(fields)).await
    }

    pub async fn update(&self, id: Uuid, fields: BookInstanceFields) -> AppResult<Option<BookInstance>> {
        self.docs.update(id, self.with_defaults(fields)).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.docs.delete(id).await
    }

    fn with_defaults(&self, mut fields: BookInstanceFields) -> BookInstanceFields {
        fields.due_back.get_or_insert(self.default_due_back);
        fields
    }

    async fn populate(
        &self,
        instances: Vec<BookInstance>,
        populate: &[BookInstanceRef],
    ) -> AppResult<Vec<PopulatedBookInstance>> {
        let books = if populate.contains(&BookInstanceRef::Book) {
            self.books.find_by_ids(instances.iter().map(|i| i.book)).await?
        } else {
            Default::default()
        };

        Ok(instances
            .into_iter()
            .map(|instance| PopulatedBookInstance {
                book: books.get(&instance.book).cloned(),
                instance,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn fields(book: Uuid, status: BookInstanceStatus) -> BookInstanceFields {
        BookInstanceFields {
            book,
            imprint: "London Gollancz, 2014.".to_string(),
            status,
            due_back: None,
        }
    }

    #[tokio::test]
    async fn test_missing_due_back_gets_repository_default() {
        let repo = BookInstancesRepository::new(Arc::new(MemoryStore::new()));
        let created = repo
            .create(fields(Uuid::new_v4(), BookInstanceStatus::Maintenance))
            .await
            .unwrap();
        assert_eq!(created.due_back, repo.default_due_back());

        let later = repo
            .create(fields(Uuid::new_v4(), BookInstanceStatus::Maintenance))
            .await
            .unwrap();
        // the default is fixed, not re-evaluated per save
        assert_eq!(later.due_back, created.due_back);
    }

    #[tokio::test]
    async fn test_counts_by_status() {
        let repo = BookInstancesRepository::new(Arc::new(MemoryStore::new()));
        let book = Uuid::new_v4();
        repo.create(fields(book, BookInstanceStatus::Available)).await.unwrap();
        repo.create(fields(book, BookInstanceStatus::Available)).await.unwrap();
        repo.create(fields(book, BookInstanceStatus::Loaned)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(
            repo.count_with_status(BookInstanceStatus::Available).await.unwrap(),
            2
        );
        assert_eq!(repo.by_book(book).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_populates_book_when_requested() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let book = Documents::<Book>::new(store.clone())
            .create(crate::models::BookFields {
                title: "Gormenghast".to_string(),
                summary: "Titus grows up.".to_string(),
                isbn: "9780099288701".to_string(),
                author: Uuid::new_v4(),
                genre: None,
            })
            .await
            .unwrap();
        let repo = BookInstancesRepository::new(store);
        let copy = repo.create(fields(book.id, BookInstanceStatus::Reserved)).await.unwrap();

        let found = repo
            .find_by_id(copy.id, &[BookInstanceRef::Book])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.book, Some(book));

        let bare = repo.find_by_id(copy.id, &[]).await.unwrap().unwrap();
        assert!(bare.book.is_none());
    }
}
