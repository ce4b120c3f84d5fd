//! Books service

use uuid::Uuid;

use super::{Created, Deletion};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookFields, BookInstance, Genre, PopulatedBook},
    repository::{BookRef, Repository},
};

/// A book with author and genre resolved, plus its copies
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: PopulatedBook,
    pub instances: Vec<BookInstance>,
}

/// Choices offered by the book form
#[derive(Debug, Clone, Default)]
pub struct BookFormOptions {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books by title, with their author
    pub async fn list(&self) -> AppResult<Vec<PopulatedBook>> {
        self.repository.books.list(&[BookRef::Author]).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self
            .repository
            .books
            .find_by_id(id, &[])
            .await?
            .map(|populated| populated.book))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let (book, instances) = tokio::try_join!(
            self.repository
                .books
                .find_by_id(id, &[BookRef::Author, BookRef::Genre]),
            self.repository.book_instances.by_book(id),
        )?;
        Ok(book.map(|book| BookDetail { book, instances }))
    }

    pub async fn form_options(&self) -> AppResult<BookFormOptions> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list(),
        )?;
        Ok(BookFormOptions { authors, genres })
    }

    /// Create unless a book with the same ISBN exists
    pub async fn create(&self, fields: BookFields) -> AppResult<Created<Book>> {
        if let Some(existing) = self.repository.books.find_by_isbn(&fields.isbn).await? {
            tracing::info!("Book with ISBN {} already exists as id={}", fields.isbn, existing.id);
            return Ok(Created::Existing(existing));
        }

        let book = self.repository.books.create(fields).await?;
        tracing::info!("Created book id={} title='{}'", book.id, book.title);
        Ok(Created::New(book))
    }

    pub async fn update(&self, id: Uuid, fields: BookFields) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .update(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        tracing::info!("Updated book id={}", book.id);
        Ok(book)
    }

    /// Remove the book unless copies of it still exist
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<BookDetail>> {
        let Some(detail) = self.detail(id).await? else {
            return Ok(Deletion::AlreadyGone);
        };
        if !detail.instances.is_empty() {
            tracing::info!(
                "Book id={} not deleted: {} copy(ies) reference it",
                id,
                detail.instances.len()
            );
            return Ok(Deletion::Blocked(detail));
        }

        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(Deletion::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AuthorFields, BookInstanceFields, BookInstanceStatus, GenreFields},
        services::testing,
    };

    async fn author(repository: &Repository) -> Author {
        repository
            .authors
            .create(AuthorFields {
                first_name: "Patrick".to_string(),
                family_name: "Rothfuss".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap()
    }

    fn fields(title: &str, isbn: &str, author: &Author) -> BookFields {
        BookFields {
            title: title.to_string(),
            summary: "Summary.".to_string(),
            isbn: isbn.to_string(),
            author: author.id,
            genre: None,
        }
    }

    #[tokio::test]
    async fn test_same_isbn_returns_existing() {
        let repository = testing::repository();
        let service = BooksService::new(repository.clone());
        let author = author(&repository).await;

        let first = service
            .create(fields("The Name of the Wind", "9781473211896", &author))
            .await
            .unwrap();
        let second = service
            .create(fields("Name of the Wind (reprint)", "9781473211896", &author))
            .await
            .unwrap();

        assert_eq!(second, Created::Existing(first.record().clone()));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_detail_populates_refs_and_copies() {
        let repository = testing::repository();
        let service = BooksService::new(repository.clone());
        let author = author(&repository).await;
        let genre = repository
            .genres
            .create(GenreFields { name: "Fantasy".to_string() })
            .await
            .unwrap();
        let mut book_fields = fields("The Wise Man's Fear", "9788401352836", &author);
        book_fields.genre = Some(genre.id);
        let book = service.create(book_fields).await.unwrap().record().clone();
        repository
            .book_instances
            .create(BookInstanceFields {
                book: book.id,
                imprint: "Gollancz, 2011.".to_string(),
                status: BookInstanceStatus::Available,
                due_back: None,
            })
            .await
            .unwrap();

        let detail = service.detail(book.id).await.unwrap().unwrap();
        assert_eq!(detail.book.author, Some(author));
        assert_eq!(detail.book.genre, Some(genre));
        assert_eq!(detail.instances.len(), 1);

        assert!(service.detail(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_blocked_by_copies() {
        let repository = testing::repository();
        let service = BooksService::new(repository.clone());
        let author = author(&repository).await;
        let book = service
            .create(fields("The Slow Regard of Silent Things", "9780756411329", &author))
            .await
            .unwrap()
            .record()
            .clone();
        let copy = repository
            .book_instances
            .create(BookInstanceFields {
                book: book.id,
                imprint: "DAW, 2014.".to_string(),
                status: BookInstanceStatus::Loaned,
                due_back: None,
            })
            .await
            .unwrap();

        assert!(matches!(service.delete(book.id).await.unwrap(), Deletion::Blocked(_)));

        repository.book_instances.delete(copy.id).await.unwrap();
        assert_eq!(service.delete(book.id).await.unwrap(), Deletion::Deleted);
        assert!(service.get(book.id).await.unwrap().is_none());
    }
}
