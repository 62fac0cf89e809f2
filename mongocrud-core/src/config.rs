//! Connection and collection settings.
//!
//! Defaults live in [`CrudConfig::default`]; there is no process-wide state.
//! The struct derives `Deserialize` so an embedding application can load it from
//! whatever configuration source it already uses.

use serde::{Deserialize, Serialize};

/// Default connection string used when none is given.
pub const DEFAULT_URI: &str = "mongodb://localhost:27017/";
/// Default database name.
pub const DEFAULT_DATABASE: &str = "test_db";
/// Default name of the collection the CRUD operations work on.
pub const DEFAULT_COLLECTION: &str = "test_collection";
/// Default name of the collection holding sequence counters.
pub const DEFAULT_COUNTER_COLLECTION: &str = "counters";

/// Names of the collections a store is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    /// Collection targeted by create/read/update/delete.
    pub documents: String,
    /// Collection holding `{ _id: <name>, seq: <n> }` counters.
    pub counters: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            documents: DEFAULT_COLLECTION.to_string(),
            counters: DEFAULT_COUNTER_COLLECTION.to_string(),
        }
    }
}

/// Everything needed to build a backend and bind a store to it.
///
/// # Example
///
/// ```ignore
/// use mongocrud::config::CrudConfig;
///
/// let config = CrudConfig::default()
///     .with_uri("mongodb://db.internal:27017/")
///     .with_database("inventory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Collections the store binds to.
    pub collections: CollectionNames,
}

impl Default for CrudConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collections: CollectionNames::default(),
        }
    }
}

impl CrudConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            collections: CollectionNames::default(),
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collections(mut self, collections: CollectionNames) -> Self {
        self.collections = collections;
        self
    }
}
