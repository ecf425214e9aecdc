// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, types::Json};

use super::{DocumentStore, StoreError};

/// Document store backed by the `documents` table (JSONB bodies keyed by
/// collection and id). See `migrations/`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(data)| data))
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::already_exists(collection, id));
        }
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        if !patch.is_object() {
            return Err(StoreError::NotAnObject);
        }
        // `||` on two JSONB objects replaces top-level keys of the left side.
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<i64, StoreError> {
        // Single statement: the row lock taken by UPDATE serializes concurrent increments.
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                    data,
                    ARRAY[$3::TEXT],
                    to_jsonb(COALESCE((data ->> $3::TEXT)::BIGINT, 0) + $4)
                ),
                updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING (data ->> $3::TEXT)::BIGINT
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to increment {}.{} on {}: {:?}", collection, field, id, e);
            StoreError::from(e)
        })?;

        value.ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, Json(data))| (id, data)).collect())
    }
}
