//! Catalog dashboard counts

use serde::Serialize;

use crate::{
    error::AppResult,
    models::BookInstanceStatus,
    repository::Repository,
    store::Filter,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather every count concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let r = &self.repository;
        let all = Filter::all();
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                r.books.count(&all),
                r.book_instances.count(),
                r.book_instances.count_with_status(BookInstanceStatus::Available),
                r.authors.count(),
                r.genres.count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}
