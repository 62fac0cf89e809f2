//! CRUD stores bound to a backend.
//!
//! - [`DocumentStore`] implements [`AsyncCrud`] over a [`StoreBackend`]
//! - [`BlockingDocumentStore`] implements [`Crud`] over a [`BlockingStoreBackend`]
//!
//! Both forward each operation to a single backend call, print the outcome and
//! return it. Neither keeps state between calls.
//!
//! # Example
//!
//! ```ignore
//! use mongocrud::prelude::*;
//! use bson::doc;
//!
//! let store = DocumentStore::new(backend);
//! store.create(doc! { "id": 0, "name": "Alice" }).await?;
//! store.read(doc! { "name": "Alice" }, QueryMode::Many, Some(10)).await?;
//! ```

use async_trait::async_trait;
use bson::{Document, doc};
use tracing::debug;

use crate::{
    backend::{BlockingStoreBackend, StoreBackend},
    config::CollectionNames,
    crud::{AsyncCrud, Crud},
    error::CrudResult,
    outcome::{Created, Deleted, ReadOutcome, Sequence, Updated, report},
    query::QueryMode,
};

fn set_values(values: Document) -> Document {
    doc! { "$set": values }
}

/// An asynchronous CRUD store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
    collections: CollectionNames,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a store over `backend` bound to the default collections.
    pub fn new(backend: B) -> Self {
        Self::with_collections(backend, CollectionNames::default())
    }

    /// Creates a store over `backend` bound to the given collections.
    pub fn with_collections(backend: B, collections: CollectionNames) -> Self {
        Self { backend, collections }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    /// Shuts down the underlying backend.
    pub async fn shutdown(self) -> CrudResult<()> {
        self.backend.shutdown().await
    }
}

#[async_trait]
impl<B: StoreBackend> AsyncCrud for DocumentStore<B> {
    async fn create(&self, document: Document) -> CrudResult<Created> {
        debug!(collection = %self.collections.documents, %document, "create");

        let outcome = Created {
            id: self
                .backend
                .insert_one(document, &self.collections.documents)
                .await?,
        };

        report(&outcome);
        Ok(outcome)
    }

    async fn read(
        &self,
        query: Document,
        mode: QueryMode,
        max_len: Option<usize>,
    ) -> CrudResult<ReadOutcome> {
        debug!(collection = %self.collections.documents, %query, ?mode, ?max_len, "read");

        let outcome = match mode {
            QueryMode::One => ReadOutcome::One(
                self.backend
                    .find_one(query, &self.collections.documents)
                    .await?,
            ),
            QueryMode::Many if max_len == Some(0) => ReadOutcome::Many(vec![]),
            QueryMode::Many => ReadOutcome::Many(
                self.backend
                    .find(query, max_len, &self.collections.documents)
                    .await?,
            ),
        };

        report(&outcome);
        Ok(outcome)
    }

    async fn update(&self, query: Document, values: Document) -> CrudResult<Updated> {
        debug!(collection = %self.collections.documents, %query, %values, "update");

        let counts = self
            .backend
            .update_one(query, set_values(values), &self.collections.documents)
            .await?;
        let outcome = Updated { matched: counts.matched, modified: counts.modified };

        report(&outcome);
        Ok(outcome)
    }

    async fn delete(&self, query: Document, mode: QueryMode) -> CrudResult<Deleted> {
        debug!(collection = %self.collections.documents, %query, ?mode, "delete");

        let deleted = match mode {
            QueryMode::One => self.backend.delete_one(query, &self.collections.documents).await?,
            QueryMode::Many => self.backend.delete_many(query, &self.collections.documents).await?,
        };
        let outcome = Deleted { deleted };

        report(&outcome);
        Ok(outcome)
    }

    async fn next_sequence(&self, name: &str) -> CrudResult<Sequence> {
        debug!(collection = %self.collections.counters, name, "next_sequence");

        let outcome = Sequence {
            name: name.to_string(),
            value: self
                .backend
                .increment_counter(name, &self.collections.counters)
                .await?,
        };

        report(&outcome);
        Ok(outcome)
    }
}

/// A blocking CRUD store bound to a specific backend implementation.
#[derive(Debug)]
pub struct BlockingDocumentStore<B: BlockingStoreBackend> {
    backend: B,
    collections: CollectionNames,
}

impl<B: BlockingStoreBackend> BlockingDocumentStore<B> {
    /// Creates a store over `backend` bound to the default collections.
    pub fn new(backend: B) -> Self {
        Self::with_collections(backend, CollectionNames::default())
    }

    /// Creates a store over `backend` bound to the given collections.
    pub fn with_collections(backend: B, collections: CollectionNames) -> Self {
        Self { backend, collections }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    /// Shuts down the underlying backend.
    pub fn shutdown(self) -> CrudResult<()> {
        self.backend.shutdown()
    }
}

impl<B: BlockingStoreBackend> Crud for BlockingDocumentStore<B> {
    fn create(&self, document: Document) -> CrudResult<Created> {
        debug!(collection = %self.collections.documents, %document, "create");

        let outcome = Created {
            id: self.backend.insert_one(document, &self.collections.documents)?,
        };

        report(&outcome);
        Ok(outcome)
    }

    fn read(
        &self,
        query: Document,
        mode: QueryMode,
        max_len: Option<usize>,
    ) -> CrudResult<ReadOutcome> {
        debug!(collection = %self.collections.documents, %query, ?mode, ?max_len, "read");

        let outcome = match mode {
            QueryMode::One => {
                ReadOutcome::One(self.backend.find_one(query, &self.collections.documents)?)
            }
            QueryMode::Many if max_len == Some(0) => ReadOutcome::Many(vec![]),
            QueryMode::Many => {
                ReadOutcome::Many(self.backend.find(query, max_len, &self.collections.documents)?)
            }
        };

        report(&outcome);
        Ok(outcome)
    }

    fn update(&self, query: Document, values: Document) -> CrudResult<Updated> {
        debug!(collection = %self.collections.documents, %query, %values, "update");

        let counts = self
            .backend
            .update_one(query, set_values(values), &self.collections.documents)?;
        let outcome = Updated { matched: counts.matched, modified: counts.modified };

        report(&outcome);
        Ok(outcome)
    }

    fn delete(&self, query: Document, mode: QueryMode) -> CrudResult<Deleted> {
        debug!(collection = %self.collections.documents, %query, ?mode, "delete");

        let deleted = match mode {
            QueryMode::One => self.backend.delete_one(query, &self.collections.documents)?,
            QueryMode::Many => self.backend.delete_many(query, &self.collections.documents)?,
        };
        let outcome = Deleted { deleted };

        report(&outcome);
        Ok(outcome)
    }

    fn next_sequence(&self, name: &str) -> CrudResult<Sequence> {
        debug!(collection = %self.collections.counters, name, "next_sequence");

        let outcome = Sequence {
            name: name.to_string(),
            value: self.backend.increment_counter(name, &self.collections.counters)?,
        };

        report(&outcome);
        Ok(outcome)
    }
}
