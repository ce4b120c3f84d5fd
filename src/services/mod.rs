//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod dashboard;
pub mod genres;

use crate::repository::Repository;

/// Result of a create that checks a natural key first
#[derive(Debug, Clone, PartialEq)]
pub enum Created<T> {
    New(T),
    /// A record with the same natural key already existed; nothing was stored
    Existing(T),
}

impl<T> Created<T> {
    pub fn record(&self) -> &T {
        match self {
            Created::New(record) | Created::Existing(record) => record,
        }
    }
}

/// Result of a delete guarded by a dependency check
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion<D> {
    Deleted,
    AlreadyGone,
    /// Still referenced; carries the record and its dependents for display
    Blocked(D),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository),
        }
    }
}
