//! In-memory document store for tests and throwaway instances

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use super::{DocumentStore, Filter, Query, SortOrder, StoredDocument};
use crate::error::{AppError, AppResult};

type Collection = IndexMap<Uuid, Value>;

/// Collections kept in insertion order behind a lock
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Failed to acquire store lock: {}", e))
}

/// Order two JSON values the way a document database orders scalars:
/// missing/null first, then numbers, then strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(_) => 3,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, body: Value) -> AppResult<Uuid> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        let id = Uuid::new_v4();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, body);
        Ok(id)
    }

    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<StoredDocument>> {
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<StoredDocument> = docs
            .iter()
            .filter(|(_, body)| query.filter.matches(body))
            .map(|(id, body)| StoredDocument {
                id: *id,
                body: body.clone(),
            })
            .collect();

        // stable sort keeps insertion order among equal keys
        if let Some(sort) = &query.sort {
            found.sort_by(|a, b| {
                let ord = compare_values(a.body.get(&sort.field), b.body.get(&sort.field));
                match sort.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        Ok(found)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<StoredDocument>> {
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .map(|body| StoredDocument {
                id,
                body: body.clone(),
            }))
    }

    async fn find_by_ids(&self, collection: &str, ids: &[Uuid]) -> AppResult<Vec<StoredDocument>> {
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .filter_map(|id| {
                docs.get(id).map(|body| StoredDocument {
                    id: *id,
                    body: body.clone(),
                })
            })
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<i64> {
        let collections = self.collections.read().map_err(lock_error)?;
        let count = collections
            .get(collection)
            .map(|docs| docs.values().filter(|body| filter.matches(body)).count())
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn replace(&self, collection: &str, id: Uuid, body: Value) -> AppResult<bool> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        match collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) {
            Some(existing) => {
                *existing = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: Uuid) -> AppResult<bool> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(&id))
            .is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        let _guard = self.collections.read().map_err(lock_error)?;
        Ok(())
    }

    async fn close(&self) {}
}
