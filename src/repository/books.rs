//! Books repository

use std::sync::Arc;

use uuid::Uuid;

use super::Documents;
use crate::{
    error::AppResult,
    models::{Author, Book, BookFields, Genre, PopulatedBook},
    store::{DocumentStore, Filter, Query, Sort},
};

/// Reference fields of a book that can be resolved on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRef {
    Author,
    Genre,
}

#[derive(Clone)]
pub struct BooksRepository {
    docs: Documents<Book>,
    authors: Documents<Author>,
    genres: Documents<Genre>,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: Documents::new(store.clone()),
            authors: Documents::new(store.clone()),
            genres: Documents::new(store),
        }
    }

    /// Find books matching `filter`, resolving the requested references
    pub async fn find_all(
        &self,
        filter: Filter,
        sort: Option<Sort>,
        populate: &[BookRef],
    ) -> AppResult<Vec<PopulatedBook>> {
        let query = Query { filter, sort };
        let books = self.docs.find(&query).await?;
        self.populate(books, populate).await
    }

    pub async fn find_by_id(&self, id: Uuid, populate: &[BookRef]) -> AppResult<Option<PopulatedBook>> {
        let Some(book) = self.docs.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.populate(vec![book], populate).await?.pop())
    }

    /// All books ordered by title
    pub async fn list(&self, populate: &[BookRef]) -> AppResult<Vec<PopulatedBook>> {
        self.find_all(Filter::all(), Some(Sort::asc("title")), populate)
            .await
    }

    pub async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.docs
            .find(&Query::new(Filter::all().eq("author", author_id.to_string())))
            .await
    }

    pub async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        self.docs
            .find(&Query::new(Filter::all().eq("genre", genre_id.to_string())))
            .await
    }

    /// Natural key lookup
    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.docs.find_one(Filter::all().eq("isbn", isbn)).await
    }

    pub async fn count(&self, filter: &Filter) -> AppResult<i64> {
        self.docs.count(filter).await
    }

    pub async fn create(&self, fields: BookFields) -> AppResult<Book> {
        self.docs.create(fields).await
    }

    pub async fn update(&self, id: Uuid, fields: BookFields) -> AppResult<Option<Book>> {
        self.docs.update(id, fields).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.docs.delete(id).await
    }

    async fn populate(&self, books: Vec<Book>, populate: &[BookRef]) -> AppResult<Vec<PopulatedBook>> {
        let authors = if populate.contains(&BookRef::Author) {
            self.authors.find_by_ids(books.iter().map(|b| b.author)).await?
        } else {
            Default::default()
        };
        let genres = if populate.contains(&BookRef::Genre) {
            self.genres
                .find_by_ids(books.iter().filter_map(|b| b.genre))
                .await?
        } else {
            Default::default()
        };

        Ok(books
            .into_iter()
            .map(|book| PopulatedBook {
                author: authors.get(&book.author).cloned(),
                genre: book.genre.and_then(|id| genres.get(&id).cloned()),
                book,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::{AuthorFields, GenreFields}, store::MemoryStore};

    async fn seeded() -> (BooksRepository, Author, Genre) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let author = Documents::<Author>::new(store.clone())
            .create(AuthorFields {
                first_name: "Isaac".to_string(),
                family_name: "Asimov".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let genre = Documents::<Genre>::new(store.clone())
            .create(GenreFields { name: "Science Fiction".to_string() })
            .await
            .unwrap();
        (BooksRepository::new(store), author, genre)
    }

    fn fields(title: &str, author: &Author, genre: Option<&Genre>) -> BookFields {
        BookFields {
            title: title.to_string(),
            summary: "A summary".to_string(),
            isbn: format!("isbn-{}", title),
            author: author.id,
            genre: genre.map(|g| g.id),
        }
    }

    #[tokio::test]
    async fn test_list_sorted_by_title_with_author_populated() {
        let (repo, author, genre) = seeded().await;
        repo.create(fields("Foundation", &author, Some(&genre))).await.unwrap();
        repo.create(fields("Apeman, Spaceman", &author, None)).await.unwrap();

        let books = repo.list(&[BookRef::Author]).await.unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.book.title.as_str()).collect();
        assert_eq!(titles, vec!["Apeman, Spaceman", "Foundation"]);
        assert!(books.iter().all(|b| b.author.as_ref() == Some(&author)));
        // genre was not requested
        assert!(books.iter().all(|b| b.genre.is_none()));
    }

    #[tokio::test]
    async fn test_find_by_id_populates_requested_refs() {
        let (repo, author, genre) = seeded().await;
        let book = repo.create(fields("Foundation", &author, Some(&genre))).await.unwrap();

        let found = repo
            .find_by_id(book.id, &[BookRef::Author, BookRef::Genre])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.author, Some(author));
        assert_eq!(found.genre, Some(genre));

        assert!(repo.find_by_id(Uuid::new_v4(), &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_author_and_genre() {
        let (repo, author, genre) = seeded().await;
        repo.create(fields("Foundation", &author, Some(&genre))).await.unwrap();
        repo.create(fields("I, Robot", &author, None)).await.unwrap();

        assert_eq!(repo.by_author(author.id).await.unwrap().len(), 2);
        assert_eq!(repo.by_genre(genre.id).await.unwrap().len(), 1);
        assert!(repo.find_by_isbn("isbn-I, Robot").await.unwrap().is_some());
    }
}
