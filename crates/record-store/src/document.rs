use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{DocumentId, Result};

/// The field map of a document.
pub type Fields = Map<String, Value>;

/// A document as stored in a collection: a store-assigned id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    /// Creates a document from an id and its fields.
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Decodes the document into a typed record.
    ///
    /// The id is exposed to the target type as an `id` field, overriding any
    /// stored field of the same name.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.to_string()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Serializes a record into a field map suitable for `add` or `update`.
    ///
    /// Fails if the record does not serialize to a JSON object.
    pub fn fields_of<T: Serialize>(record: &T) -> Result<Fields> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {other}"
            ))
            .into()),
        }
    }
}
