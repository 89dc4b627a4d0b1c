use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{Document, DocumentId, Fields, RecordStoreError, Result, store::RecordStore};

/// PostgreSQL-backed record store implementation.
///
/// All collections share one `documents` table keyed by `(collection, id)`
/// with the fields held in a JSONB column.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        let id: String = row.try_get("id")?;
        let fields = match row.try_get::<Value, _>("fields")? {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        Ok(Document::new(DocumentId::new(id), fields))
    }

    fn not_found(collection: &str, id: &DocumentId) -> RecordStoreError {
        RecordStoreError::NotFound {
            collection: collection.to_string(),
            id: id.clone(),
        }
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId> {
        let id = DocumentId::generate();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, fields)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET fields = fields || $3
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(collection, id));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn query_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1 AND fields -> $2 = $3
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn increment(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        by: i64,
    ) -> Result<i64> {
        // Single statement, so concurrent increments cannot lose updates
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET fields = jsonb_set(
                fields,
                ARRAY[$3::text],
                to_jsonb(
                    CASE WHEN jsonb_typeof(fields -> $3) = 'number'
                        THEN (fields ->> $3)::bigint
                        ELSE 0
                    END + $4
                )
            )
            WHERE collection = $1 AND id = $2
            RETURNING (fields ->> $3)::bigint
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(field)
        .bind(by)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Self::not_found(collection, id))
    }
}
