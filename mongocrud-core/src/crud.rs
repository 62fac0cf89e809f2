//! The CRUD contract.
//!
//! [`Crud`] and [`AsyncCrud`] carry the same operations with the same arguments
//! and outcomes; they differ only in whether a call blocks the thread or
//! suspends the task. Implementations print every outcome to stdout with
//! [`report`](crate::outcome::report) before returning it.

use async_trait::async_trait;
use bson::Document;

use crate::{
    error::CrudResult,
    outcome::{Created, Deleted, ReadOutcome, Sequence, Updated},
    query::QueryMode,
};

/// Blocking CRUD operations over one collection.
pub trait Crud {
    /// Inserts `document` and reports its identifier.
    ///
    /// # Errors
    ///
    /// Driver failures (duplicate key, connection loss, ...) propagate unchanged.
    fn create(&self, document: Document) -> CrudResult<Created>;

    /// Reads documents matching `query`.
    ///
    /// With [`QueryMode::One`] the first match is returned, or `None`; with
    /// [`QueryMode::Many`] at most `max_len` matches are returned (`None` means
    /// unbounded) in the order the database produced them. `max_len` is ignored
    /// in `One` mode.
    fn read(
        &self,
        query: Document,
        mode: QueryMode,
        max_len: Option<usize>,
    ) -> CrudResult<ReadOutcome>;

    /// Merges `values` into the first document matching `query` as a field-level set.
    fn update(&self, query: Document, values: Document) -> CrudResult<Updated>;

    /// Deletes the first (`One`) or every (`Many`) document matching `query`.
    fn delete(&self, query: Document, mode: QueryMode) -> CrudResult<Deleted>;

    /// Advances the named counter in the counter collection and returns its new value.
    fn next_sequence(&self, name: &str) -> CrudResult<Sequence>;

    /// Shorthand for [`read`](Crud::read) in [`QueryMode::One`].
    fn read_one(&self, query: Document) -> CrudResult<ReadOutcome> {
        self.read(query, QueryMode::One, None)
    }

    /// Shorthand for [`read`](Crud::read) in [`QueryMode::Many`].
    fn read_many(&self, query: Document, max_len: Option<usize>) -> CrudResult<ReadOutcome> {
        self.read(query, QueryMode::Many, max_len)
    }
}

/// Asynchronous CRUD operations over one collection. See [`Crud`] for semantics.
#[async_trait]
pub trait AsyncCrud: Send + Sync {
    async fn create(&self, document: Document) -> CrudResult<Created>;

    async fn read(
        &self,
        query: Document,
        mode: QueryMode,
        max_len: Option<usize>,
    ) -> CrudResult<ReadOutcome>;

    async fn update(&self, query: Document, values: Document) -> CrudResult<Updated>;

    async fn delete(&self, query: Document, mode: QueryMode) -> CrudResult<Deleted>;

    async fn next_sequence(&self, name: &str) -> CrudResult<Sequence>;

    /// Shorthand for [`read`](AsyncCrud::read) in [`QueryMode::One`].
    async fn read_one(&self, query: Document) -> CrudResult<ReadOutcome> {
        self.read(query, QueryMode::One, None).await
    }

    /// Shorthand for [`read`](AsyncCrud::read) in [`QueryMode::Many`].
    async fn read_many(&self, query: Document, max_len: Option<usize>) -> CrudResult<ReadOutcome> {
        self.read(query, QueryMode::Many, max_len).await
    }
}
