use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Document, DocumentId, Fields, RecordStoreError, Result, store::RecordStore};

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    fail_on_increment: bool,
    fail_on_query: bool,
    failing_deletes: HashSet<DocumentId>,
}

/// In-memory record store implementation.
///
/// Collections keep documents in insertion order. Used by tests and by
/// deployments without a `DATABASE_URL`; it provides the same interface as
/// the PostgreSQL implementation plus fault injection for exercising error
/// paths.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    faults: Arc<RwLock<Faults>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document with a caller-chosen id, replacing any existing one.
    ///
    /// Useful for seeding fixtures with readable ids.
    pub async fn insert_with_id(&self, collection: &str, id: DocumentId, fields: Fields) {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        match documents.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.fields = fields,
            None => documents.push(Document::new(id, fields)),
        }
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Makes every operation fail with `Unavailable` while set.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.faults.write().await.unavailable = unavailable;
    }

    /// Makes `increment` fail with `Unavailable` while set.
    pub async fn set_fail_on_increment(&self, fail: bool) {
        self.faults.write().await.fail_on_increment = fail;
    }

    /// Makes `query_where` fail with `Unavailable` while set.
    pub async fn set_fail_on_query(&self, fail: bool) {
        self.faults.write().await.fail_on_query = fail;
    }

    /// Makes deletes of the given document fail with `Unavailable`.
    pub async fn fail_delete_of(&self, id: DocumentId) {
        self.faults.write().await.failing_deletes.insert(id);
    }

    async fn check_available(&self) -> Result<()> {
        if self.faults.read().await.unavailable {
            return Err(RecordStoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn not_found(collection: &str, id: &DocumentId) -> RecordStoreError {
        RecordStoreError::NotFound {
            collection: collection.to_string(),
            id: id.clone(),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.check_available().await?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        self.check_available().await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId> {
        self.check_available().await?;
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<()> {
        self.check_available().await?;
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        document.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        self.check_available().await?;
        if self.faults.read().await.failing_deletes.contains(id) {
            return Err(RecordStoreError::Unavailable(format!(
                "delete of {collection}/{id} rejected"
            )));
        }
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| &d.id != id);
        }
        Ok(())
    }

    async fn query_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        self.check_available().await?;
        if self.faults.read().await.fail_on_query {
            return Err(RecordStoreError::Unavailable(format!(
                "query of {collection} by {field} rejected"
            )));
        }
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        by: i64,
    ) -> Result<i64> {
        self.check_available().await?;
        if self.faults.read().await.fail_on_increment {
            return Err(RecordStoreError::Unavailable(format!(
                "increment of {collection}/{id}.{field} rejected"
            )));
        }
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        let current = document.get(field).and_then(Value::as_i64).unwrap_or(0);
        let updated = current + by;
        document.fields.insert(field.to_string(), Value::from(updated));
        Ok(updated)
    }
}
