//! PostgreSQL-backed document store
//!
//! Every collection shares one `documents` table; bodies are JSONB and
//! equality filters use containment so the GIN index applies.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Condition, DocumentStore, Filter, Query, SortOrder, StoredDocument};
use crate::{config::DatabaseConfig, error::AppResult};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the connection pool
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");
        Ok(Self::new(pool))
    }

    /// Run the embedded migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

/// Append `AND ...` clauses for a filter. Plain equalities are folded into a
/// single containment document.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    let mut contained = Map::new();

    for condition in &filter.conditions {
        match condition {
            Condition::Eq(field, value) => {
                contained.insert(field.clone(), value.clone());
            }
            Condition::EqIgnoreCase(field, value) => {
                builder
                    .push(" AND lower(body ->> ")
                    .push_bind(field.clone())
                    .push(") = lower(")
                    .push_bind(value.clone())
                    .push(")");
            }
        }
    }

    if !contained.is_empty() {
        builder
            .push(" AND body @> ")
            .push_bind(Value::Object(contained));
    }
}

fn select_query(collection: &str, query: &Query) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT id, body FROM documents WHERE collection = ");
    builder.push_bind(collection.to_string());
    push_filter(&mut builder, &query.filter);

    // Insertion order breaks ties and orders unsorted queries
    builder.push(" ORDER BY ");
    if let Some(sort) = &query.sort {
        builder.push("body -> ").push_bind(sort.field.clone());
        builder.push(match sort.order {
            SortOrder::Asc => " ASC, ",
            SortOrder::Desc => " DESC, ",
        });
    }
    builder.push("seq");
    builder
}

fn count_query(collection: &str, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*)::bigint FROM documents WHERE collection = ");
    builder.push_bind(collection.to_string());
    push_filter(&mut builder, filter);
    builder
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, body: Value) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(&body)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<StoredDocument>> {
        let mut builder = select_query(collection, query);
        let rows: Vec<(Uuid, Value)> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(id, body)| StoredDocument { id, body })
            .collect())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<StoredDocument>> {
        let row: Option<(Uuid, Value)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, body)| StoredDocument { id, body }))
    }

    async fn find_by_ids(&self, collection: &str, ids: &[Uuid]) -> AppResult<Vec<StoredDocument>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid, Value)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = ANY($2)",
        )
        .bind(collection)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, body)| StoredDocument { id, body })
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<i64> {
        let mut builder = count_query(collection, filter);
        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn replace(&self, collection: &str, id: Uuid, body: Value) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET body = $1, updated_at = now() WHERE collection = $2 AND id = $3",
        )
        .bind(&body)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connections closed");
    }
}
