//! MongoDB backends for mongocrud.
//!
//! This crate provides two implementations over the official driver:
//!
//! - [`MongoDbStore`] - async, built on [`mongodb::Client`]
//! - [`BlockingMongoDbStore`] - blocking, built on [`mongodb::sync::Client`]
//!
//! Filters and update documents reach the server exactly as the caller wrote
//! them. Connection pooling, authentication and server selection are left to
//! the driver.
//!
//! To use these backends through the facade crate, enable its `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! mongocrud = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mongocrud::{config::CrudConfig, mongodb::connect, prelude::*};
//! use bson::doc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CrudResult<()> {
//!     let store = connect(&CrudConfig::default()).await?;
//!
//!     store.create(doc! { "id": 0, "name": "Alice" }).await?;
//!     store.shutdown().await
//! }
//! ```

pub mod blocking;
pub mod store;

pub use blocking::{BlockingMongoDbStore, BlockingMongoDbStoreBuilder};
pub use store::{MongoDbStore, MongoDbStoreBuilder};

use bson::{Bson, Document};

use mongocrud_core::{
    backend::{BlockingStoreBackendBuilder, StoreBackendBuilder},
    config::CrudConfig,
    error::{CrudError, CrudResult},
    store::{BlockingDocumentStore, DocumentStore},
};

/// Builds an async client from `config` and binds a store to its collections.
pub async fn connect(config: &CrudConfig) -> CrudResult<DocumentStore<MongoDbStore>> {
    let backend = MongoDbStore::builder(&config.uri, &config.database)
        .build()
        .await?;

    Ok(DocumentStore::with_collections(backend, config.collections.clone()))
}

/// Builds a blocking client from `config` and binds a store to its collections.
pub fn connect_blocking(
    config: &CrudConfig,
) -> CrudResult<BlockingDocumentStore<BlockingMongoDbStore>> {
    let backend = BlockingMongoDbStore::builder(&config.uri, &config.database).build()?;

    Ok(BlockingDocumentStore::with_collections(backend, config.collections.clone()))
}

/// Converts a read bound into a cursor limit.
///
/// Bounds past `i64::MAX` mean no limit. A negative limit would make the driver
/// return a single batch.
pub(crate) fn cursor_limit(limit: Option<usize>) -> Option<i64> {
    limit.and_then(|limit| i64::try_from(limit).ok())
}

/// Extracts `seq` from the counter document returned by an upserting `$inc`.
pub(crate) fn counter_value(name: &str, counter: Option<Document>) -> CrudResult<i64> {
    let invalid = || {
        CrudError::InvalidUpdate(format!("counter '{name}' holds a non-integer sequence"))
    };

    match counter.as_ref().and_then(|counter| counter.get("seq")) {
        Some(Bson::Int64(seq)) => Ok(*seq),
        Some(Bson::Int32(seq)) => Ok(i64::from(*seq)),
        _ => Err(invalid()),
    }
}
