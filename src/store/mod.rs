// src/store/mod.rs

//! Keyed JSON document storage over named collections.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Collection names shared by every store implementation.
pub mod collections {
    pub const PENDING_VERIFICATIONS: &str = "pending_verifications";
    pub const USERS: &str = "users";
    pub const ACCOUNTS: &str = "accounts";
    pub const JOB_POSTINGS: &str = "job_postings";
    pub const DEPARTMENTS: &str = "departments";
    pub const JOB_APPLICATIONS: &str = "job_applications";
    pub const OFFER_LETTERS: &str = "offer_letters";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document '{id}' not found in {collection}")]
    NotFound { collection: String, id: String },
    #[error("document '{id}' already exists in {collection}")]
    AlreadyExists { collection: String, id: String },
    #[error("field '{field}' of '{id}' is not an integer")]
    NotAnInteger { id: String, field: String },
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(collection: &str, id: &str) -> Self {
        StoreError::AlreadyExists {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Storage abstraction so services can be exercised with an in-memory store.
///
/// Documents are JSON objects. The document id is the key and is not part of
/// the stored body; [`from_document`] injects it as an `id` field on read.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Creates or overwrites the document.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Inserts only if no document with this id exists.
    async fn create(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Shallow merge of the top-level keys of `patch` into an existing document.
    async fn merge(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Atomically adds `by` to an integer field (missing counts as 0) and
    /// returns the new value.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<i64, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Inserts under a freshly generated id and returns it.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.create(collection, &id, data).await?;
        Ok(id)
    }
}

/// Serializes a model into a document body, dropping its `id` field.
pub fn to_document<T: Serialize>(model: &T) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(model)?;
    match value.as_object_mut() {
        Some(object) => {
            object.remove("id");
            Ok(value)
        }
        None => Err(StoreError::NotAnObject),
    }
}

/// Deserializes a stored body, exposing the document key as `id`.
pub fn from_document<T: DeserializeOwned>(id: &str, mut value: Value) -> Result<T, StoreError> {
    match value.as_object_mut() {
        Some(object) => {
            object.insert("id".to_string(), Value::String(id.to_string()));
        }
        None => return Err(StoreError::NotAnObject),
    }
    Ok(serde_json::from_value(value)?)
}

pub async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(collection, id).await? {
        Some(value) => Ok(Some(from_document(id, value)?)),
        None => Ok(None),
    }
}

/// Like [`fetch`] but a missing document is `StoreError::NotFound`.
pub async fn fetch_required<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<T, StoreError> {
    fetch(store, collection, id)
        .await?
        .ok_or_else(|| StoreError::not_found(collection, id))
}

pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .list(collection)
        .await?
        .into_iter()
        .map(|(id, value)| from_document(&id, value))
        .collect()
}
