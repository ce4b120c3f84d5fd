//! Document store boundary
//!
//! Records live in named collections as JSON documents keyed by a
//! store-assigned id. The repository layer is the only caller; it maps
//! documents to typed models and decides which references to resolve.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::AppResult,
};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A document as read back from a collection
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: Value,
}

/// One clause of a filter; all clauses of a [`Filter`] must hold
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given JSON value
    Eq(String, Value),
    /// Field is a string equal to the given one, ignoring case
    EqIgnoreCase(String, String),
}

impl Condition {
    pub fn matches(&self, body: &Value) -> bool {
        match self {
            Condition::Eq(field, expected) => body.get(field) == Some(expected),
            Condition::EqIgnoreCase(field, expected) => body
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|actual| actual.to_lowercase() == expected.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn eq_ignore_case(mut self, field: &str, value: &str) -> Self {
        self.conditions
            .push(Condition::EqIgnoreCase(field.to_string(), value.to_string()));
        self
    }

    pub fn matches(&self, body: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// Filter plus optional sort key. Without a sort key documents come back in
/// insertion order; ties on the sort key also fall back to insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Collection-oriented persistence used by the repositories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its assigned id
    async fn insert(&self, collection: &str, body: Value) -> AppResult<Uuid>;

    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<StoredDocument>>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<StoredDocument>>;

    /// Fetch every listed id that exists, in no particular order
    async fn find_by_ids(&self, collection: &str, ids: &[Uuid]) -> AppResult<Vec<StoredDocument>>;

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<i64>;

    /// Replace the whole body of a document. Returns false when the id is unknown.
    async fn replace(&self, collection: &str, id: Uuid, body: Value) -> AppResult<bool>;

    /// Remove a document. Returns false when it was already gone.
    async fn delete(&self, collection: &str, id: Uuid) -> AppResult<bool>;

    /// Round trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;

    async fn close(&self);
}

/// Open the configured store
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            let store = PgDocumentStore::connect(config).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_all_matches_anything() {
        assert!(Filter::all().matches(&json!({"name": "Fantasy"})));
        assert!(Filter::all().matches(&json!({})));
    }

    #[test]
    fn test_filter_eq_requires_every_condition() {
        let filter = Filter::all().eq("status", "Available").eq("book", "b1");
        assert!(filter.matches(&json!({"status": "Available", "book": "b1"})));
        assert!(!filter.matches(&json!({"status": "Available", "book": "b2"})));
        assert!(!filter.matches(&json!({"book": "b1"})));
    }

    #[test]
    fn test_filter_eq_ignore_case() {
        let filter = Filter::all().eq_ignore_case("name", "science fiction");
        assert!(filter.matches(&json!({"name": "Science Fiction"})));
        assert!(!filter.matches(&json!({"name": "Science"})));
        assert!(!filter.matches(&json!({"name": 42})));
    }
}
