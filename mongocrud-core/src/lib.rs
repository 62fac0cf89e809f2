//! Core of the mongocrud project: a thin CRUD layer over a document database.
//!
//! This crate provides:
//!
//! - **CRUD contract** ([`crud`]) - [`Crud`](crud::Crud) and [`AsyncCrud`](crud::AsyncCrud),
//!   one operation set, two suspension models
//! - **Stores** ([`store`]) - Blocking and async stores that forward to a backend and report
//!   outcomes
//! - **Backend abstraction** ([`backend`]) - Driver-level primitives implemented by concrete
//!   databases
//! - **Outcomes** ([`outcome`]) - Typed results whose `Display` is the console message
//! - **Filter expressions** ([`query`]) - Query modes and a filter AST for in-process evaluation
//! - **Configuration** ([`config`]) - Connection string, database and collection names
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use mongocrud::prelude::*;
//! use bson::doc;
//!
//! let store = BlockingDocumentStore::new(backend);
//!
//! store.create(doc! { "id": 0, "name": "Alice" })?;
//! store.update(doc! { "name": "Alice" }, doc! { "age": 31 })?;
//! store.delete(doc! { "name": "Alice" }, QueryMode::Many)?;
//! ```

pub mod backend;
pub mod config;
pub mod crud;
pub mod error;
pub mod outcome;
pub mod query;
pub mod store;
