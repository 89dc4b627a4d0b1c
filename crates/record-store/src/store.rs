use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Document, DocumentId, Fields, RecordStoreError, Result};

/// Core trait for record store implementations.
///
/// A record store holds named collections of JSON documents. Ids are
/// assigned by the store. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every document in a collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Retrieves one document.
    ///
    /// Returns None if the document doesn't exist.
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>>;

    /// Creates a document and returns its newly assigned id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId>;

    /// Merges `fields` into an existing document.
    ///
    /// Fails with `NotFound` if the document doesn't exist.
    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<()>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()>;

    /// Returns the documents whose `field` equals `value`, in insertion order.
    async fn query_where(&self, collection: &str, field: &str, value: &Value)
    -> Result<Vec<Document>>;

    /// Atomically adds `by` to a numeric field of one document.
    ///
    /// A missing or non-numeric field is treated as 0. Fails with `NotFound`
    /// if the document doesn't exist. Returns the new value.
    async fn increment(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        by: i64,
    ) -> Result<i64>;
}

/// Extension trait providing typed convenience methods for record stores.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Lists a collection decoded into typed records.
    ///
    /// Documents that fail to decode are skipped and logged, so one malformed
    /// document cannot take down a whole listing.
    async fn list_decoded<T>(&self, collection: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let documents = self.list(collection).await?;
        Ok(decode_all(collection, &documents))
    }

    /// Queries a collection and decodes the matches, skipping malformed ones.
    async fn query_decoded<T>(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let documents = self.query_where(collection, field, value).await?;
        Ok(decode_all(collection, &documents))
    }

    /// Retrieves and decodes one document.
    async fn get_decoded<T>(&self, collection: &str, id: &DocumentId) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(collection, id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Checks if a document exists.
    async fn exists(&self, collection: &str, id: &DocumentId) -> Result<bool> {
        Ok(self.get(collection, id).await?.is_some())
    }

    /// Retrieves a document, failing with `NotFound` if it doesn't exist.
    async fn require(&self, collection: &str, id: &DocumentId) -> Result<Document> {
        self.get(collection, id)
            .await?
            .ok_or_else(|| RecordStoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}

fn decode_all<T: DeserializeOwned>(collection: &str, documents: &[Document]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|document| match document.decode() {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection,
                    id = %document.id,
                    error = %e,
                    "skipping malformed document"
                );
                None
            }
        })
        .collect()
}
