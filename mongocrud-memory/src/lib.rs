//! In-memory document storage backend for mongocrud.
//!
//! This crate provides a thread-safe, in-process implementation of both backend
//! traits. It evaluates MongoDB-style filters and update operators itself, which
//! makes it the backend of choice for tests and for running the demo without a
//! database server.
//!
//! # Features
//!
//! - **Both flavours** - Implements `StoreBackend` and `BlockingStoreBackend` over shared state
//! - **Natural order** - Documents keep insertion order, so "first match" is deterministic
//! - **Filters** - Equality, comparisons, `$in`/`$nin`, `$exists`, `$not`,
//!   `$and`/`$or`/`$nor`, dotted paths
//! - **Updates** - `$set`, `$unset`, `$inc`, with `_id` kept immutable
//!
//! # Quick Start
//!
//! ```ignore
//! use mongocrud::{memory::InMemoryStore, prelude::*};
//! use bson::doc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CrudResult<()> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!
//!     store.create(doc! { "id": 0, "name": "Alice" }).await?;
//!     store.read(doc! { "name": "Alice" }, QueryMode::One, None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
mod evaluator;
mod update;

pub use store::InMemoryStore;
