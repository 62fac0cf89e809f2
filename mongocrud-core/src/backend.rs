//! Driver-facing backend abstraction.
//!
//! A backend exposes the handful of driver calls the CRUD stores forward to.
//! There are two flavours with the same method set:
//!
//! - [`StoreBackend`]: suspends the calling task while the driver works
//! - [`BlockingStoreBackend`]: blocks the calling thread
//!
//! Backends take the collection name on every call and hold no per-call state.
//! Filters and update documents are passed through in MongoDB syntax.
//!
//! # Example
//!
//! ```ignore
//! use mongocrud::backend::StoreBackend;
//! use bson::doc;
//!
//! let id = backend.insert_one(doc! { "name": "Alice" }, "users").await?;
//! let alice = backend.find_one(doc! { "_id": id }, "users").await?;
//! ```

use async_trait::async_trait;
use bson::{Bson, Document};
use std::fmt::Debug;

use crate::error::CrudResult;

/// Counts reported by the driver for a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

/// Asynchronous document storage backend.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the stores share a backend by reference.
///
/// # Error Handling
///
/// Driver failures are returned as [`CrudError::Backend`](crate::error::CrudError::Backend)
/// with the original error as the source.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document, returning its `_id`.
    ///
    /// The backend generates an `ObjectId` when the document has no `_id`.
    async fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>>;

    /// Returns documents matching `filter` in natural order, at most `limit` of them.
    async fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>>;

    /// Applies `update` (an operator document such as `{ "$set": ... }`) to the
    /// first document matching `filter`.
    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts>;

    /// Deletes the first document matching `filter`, returning the deleted count.
    async fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64>;

    /// Deletes every document matching `filter`, returning the deleted count.
    async fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64>;

    /// Atomically increments the counter `name`, creating it when missing, and
    /// returns the new value.
    async fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64>;

    /// Releases the backend's resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> CrudResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        (*self).insert_one(document, collection).await
    }

    async fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        (*self).find_one(filter, collection).await
    }

    async fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        (*self).find(filter, limit, collection).await
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        (*self).update_one(filter, update, collection).await
    }

    async fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        (*self).delete_one(filter, collection).await
    }

    async fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        (*self).delete_many(filter, collection).await
    }

    async fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        (*self).increment_counter(name, collection).await
    }
}

/// Blocking document storage backend, the thread-blocking twin of [`StoreBackend`].
pub trait BlockingStoreBackend: Send + Sync + Debug {
    /// Inserts a document, returning its `_id`.
    fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson>;

    /// Returns the first document matching `filter`, if any.
    fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>>;

    /// Returns documents matching `filter` in natural order, at most `limit` of them.
    fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>>;

    /// Applies `update` to the first document matching `filter`.
    fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts>;

    fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64>;

    fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64>;

    /// Atomically increments the counter `name` and returns the new value.
    fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64>;

    /// Releases the backend's resources. No-op by default.
    fn shutdown(self) -> CrudResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<B> BlockingStoreBackend for &B
where
    B: BlockingStoreBackend,
{
    fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        (*self).insert_one(document, collection)
    }

    fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        (*self).find_one(filter, collection)
    }

    fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        (*self).find(filter, limit, collection)
    }

    fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        (*self).update_one(filter, update, collection)
    }

    fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        (*self).delete_one(filter, collection)
    }

    fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        (*self).delete_many(filter, collection)
    }

    fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        (*self).increment_counter(name, collection)
    }
}

/// Factory for asynchronous backends.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> CrudResult<Self::Backend>;
}

/// Factory for blocking backends.
pub trait BlockingStoreBackendBuilder {
    type Backend: BlockingStoreBackend;

    fn build(self) -> CrudResult<Self::Backend>;
}
