//! A thin CRUD layer over a document database, in a blocking and an async flavour.
//!
//! This crate is the entry point of the mongocrud project. It re-exports the core
//! contract and stores, the in-memory backend, the MongoDB backends (behind the
//! `mongodb` feature) and the scripted demo.
//!
//! # Quick Start
//!
//! ```ignore
//! use mongocrud::{memory::InMemoryStore, prelude::*};
//! use bson::doc;
//!
//! fn main() -> CrudResult<()> {
//!     let store = BlockingDocumentStore::new(InMemoryStore::new());
//!
//!     store.create(doc! { "id": 0, "name": "Alice" })?;
//!     // Found document: { "_id": ObjectId("..."), "id": 0, "name": "Alice" }
//!     store.read(doc! { "name": "Alice" }, QueryMode::One, None)?;
//!     // Modified 1 document(s).
//!     store.update(doc! { "name": "Alice" }, doc! { "age": 31 })?;
//!     // Deleted 1 document(s).
//!     store.delete(doc! { "name": "Alice" }, QueryMode::Many)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Async
//!
//! [`DocumentStore`](store::DocumentStore) offers the same operations through
//! [`AsyncCrud`](crud::AsyncCrud):
//!
//! ```ignore
//! use mongocrud::{config::CrudConfig, mongodb::connect, prelude::*};
//! use bson::doc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CrudResult<()> {
//!     let store = connect(&CrudConfig::default()).await?;
//!
//!     store.read(doc! { "name": "Alice" }, QueryMode::Many, Some(10)).await?;
//!     store.shutdown().await
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-process storage for tests and offline demos
//! - [`mongodb`] - MongoDB over the official driver (requires `mongodb` feature)

pub mod demo;
pub mod prelude;

pub use mongocrud_core::{backend, config, crud, error, outcome, query, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend.
pub mod memory {
    pub use mongocrud_memory::InMemoryStore;
}

/// MongoDB storage backends.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use mongocrud_mongodb::{
        BlockingMongoDbStore, BlockingMongoDbStoreBuilder, MongoDbStore, MongoDbStoreBuilder,
        connect, connect_blocking,
    };
}
