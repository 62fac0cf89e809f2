//! Error types and result types for CRUD operations.
//!
//! Driver failures are never translated: they travel inside [`CrudError::Backend`]
//! and stay reachable through [`std::error::Error::source`]. Use [`CrudResult<T>`]
//! as the return type for fallible operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Boxed error produced by an underlying database driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors that can occur when talking to a document store.
///
/// "Not found" and zero affected documents are not errors; they are reported
/// through the operation outcomes instead.
#[derive(Error, Debug)]
pub enum CrudError {
    /// The client could not be constructed (malformed URI, bad options, ...).
    #[error("Initialization error: {0}")]
    Initialization(#[source] BoxError),
    /// The underlying driver failed. The driver error is kept as the source.
    #[error("Backend error: {0}")]
    Backend(#[source] BoxError),
    /// A document with the given `_id` already exists in the collection.
    /// The first field is the rendered id, the second the collection name.
    #[error("Duplicate key {id} in collection {collection}")]
    DuplicateKey { id: String, collection: String },
    /// The filter uses an operator the backend cannot evaluate.
    #[error("Unsupported query operator: {0}")]
    UnsupportedOperator(String),
    /// The filter is structurally invalid (wrong operand type for an operator).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The update document is malformed or would modify an immutable field.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    /// Serialization/deserialization error when converting BSON values.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CrudError {
    /// Wraps a driver error without altering it.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        CrudError::Backend(err.into())
    }

    /// Wraps a client construction error without altering it.
    pub fn initialization(err: impl Into<BoxError>) -> Self {
        CrudError::Initialization(err.into())
    }
}

/// A specialized `Result` type for CRUD operations.
pub type CrudResult<T> = Result<T, CrudError>;

impl From<BsonError> for CrudError {
    fn from(err: BsonError) -> Self {
        CrudError::Serialization(err.to_string())
    }
}
