//! Convenient re-exports of commonly used types from mongocrud.
//!
//! ```ignore
//! use mongocrud::prelude::*;
//! ```
//!
//! Brings both contract traits into scope. A store type implements only one of
//! them, so calls on a store never become ambiguous.

pub use mongocrud_core::{
    backend::{
        BlockingStoreBackend, BlockingStoreBackendBuilder, StoreBackend, StoreBackendBuilder,
        UpdateCounts,
    },
    config::{CollectionNames, CrudConfig},
    crud::{AsyncCrud, Crud},
    error::{CrudError, CrudResult},
    outcome::{Created, Deleted, ReadOutcome, Sequence, Updated},
    query::QueryMode,
    store::{BlockingDocumentStore, DocumentStore},
};
