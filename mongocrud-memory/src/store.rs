//! In-memory storage implementation.
//!
//! Documents live in per-collection vectors, so "first match" and cursor order are
//! insertion order, the same natural order a fresh MongoDB collection yields.

use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use mongocrud_core::{
    backend::{BlockingStoreBackend, StoreBackend, UpdateCounts},
    error::{CrudError, CrudResult},
    query::Expr,
};

use crate::{
    evaluator::{DocumentEvaluator, values_equal},
    update::apply_update,
};

type CollectionDocs = Vec<Document>;
type StoreMap = HashMap<String, CollectionDocs>;

/// Thread-safe in-memory document storage backend.
///
/// Implements both [`StoreBackend`] and [`BlockingStoreBackend`] over the same
/// state. Clones share that state, so a blocking store and an async store built
/// from clones of one `InMemoryStore` see each other's writes.
///
/// # Example
///
/// ```ignore
/// use mongocrud::{memory::InMemoryStore, prelude::*};
/// use bson::doc;
///
/// let store = BlockingDocumentStore::new(InMemoryStore::new());
/// store.create(doc! { "name": "Alice" })?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every document in `collection`, in natural order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.store
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn matcher(filter: &Document) -> CrudResult<impl Fn(&Document) -> CrudResult<bool>> {
        let expr = Expr::from_filter(filter)?;

        Ok(move |document: &Document| DocumentEvaluator::new(document).evaluate(&expr))
    }

    fn position(docs: &[Document], filter: &Document) -> CrudResult<Option<usize>> {
        let matches = Self::matcher(filter)?;

        for (index, document) in docs.iter().enumerate() {
            if matches(document)? {
                return Ok(Some(index));
            }
        }

        Ok(None)
    }

    fn insert_document(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        let (id, document) = match document.get("_id") {
            Some(id) => (id.clone(), document),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut with_id = doc! { "_id": id.clone() };
                for (key, value) in document {
                    with_id.insert(key, value);
                }
                (id, with_id)
            }
        };

        let mut store = self.store.write();
        let docs = store.entry(collection.to_string()).or_default();

        if docs
            .iter()
            .any(|existing| existing.get("_id").is_some_and(|other| values_equal(other, &id)))
        {
            return Err(CrudError::DuplicateKey {
                id: id.to_string(),
                collection: collection.to_string(),
            });
        }

        docs.push(document);
        Ok(id)
    }

    fn find_first(&self, filter: &Document, collection: &str) -> CrudResult<Option<Document>> {
        let store = self.store.read();

        match store.get(collection) {
            Some(docs) => Ok(Self::position(docs, filter)?.map(|index| docs[index].clone())),
            None => Ok(None),
        }
    }

    fn find_all(
        &self,
        filter: &Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        let store = self.store.read();
        let docs = match store.get(collection) {
            Some(docs) => docs,
            None => return Ok(vec![]),
        };

        let matches = Self::matcher(filter)?;
        let mut found = Vec::new();

        for document in docs {
            if limit.is_some_and(|limit| found.len() >= limit) {
                break;
            }
            if matches(document)? {
                found.push(document.clone());
            }
        }

        Ok(found)
    }

    fn update_first(
        &self,
        filter: &Document,
        update: &Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        let mut store = self.store.write();
        let docs = match store.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(UpdateCounts::default()),
        };

        match Self::position(docs, filter)? {
            Some(index) => {
                let (updated, changed) = apply_update(&docs[index], update)?;

                if changed {
                    docs[index] = updated;
                }

                Ok(UpdateCounts { matched: 1, modified: u64::from(changed) })
            }
            None => Ok(UpdateCounts::default()),
        }
    }

    fn remove(&self, filter: &Document, many: bool, collection: &str) -> CrudResult<u64> {
        let mut store = self.store.write();
        let docs = match store.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        if !many {
            return Ok(match Self::position(docs, filter)? {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            });
        }

        let matches = Self::matcher(filter)?;
        let doomed = docs
            .iter()
            .map(|document| matches(document))
            .collect::<CrudResult<Vec<bool>>>()?;
        let mut flags = doomed.iter();

        docs.retain(|_| !flags.next().copied().unwrap_or(false));

        Ok(doomed.into_iter().filter(|doomed| *doomed).count() as u64)
    }

    fn increment(&self, name: &str, collection: &str) -> CrudResult<i64> {
        let mut store = self.store.write();
        let docs = store.entry(collection.to_string()).or_default();

        let counter = docs
            .iter_mut()
            .find(|counter| counter.get_str("_id").is_ok_and(|id| id == name));

        match counter {
            Some(counter) => {
                let next = match counter.get("seq") {
                    Some(Bson::Int32(seq)) => i64::from(*seq) + 1,
                    Some(Bson::Int64(seq)) => seq + 1,
                    None => 1,
                    Some(_) => {
                        return Err(CrudError::InvalidUpdate(format!(
                            "counter '{name}' holds a non-integer sequence"
                        )));
                    }
                };

                counter.insert("seq", next);
                Ok(next)
            }
            None => {
                docs.push(doc! { "_id": name, "seq": 1_i64 });
                Ok(1)
            }
        }
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        self.insert_document(document, collection)
    }

    async fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        self.find_first(&filter, collection)
    }

    async fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        self.find_all(&filter, limit, collection)
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        self.update_first(&filter, &update, collection)
    }

    async fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        self.remove(&filter, false, collection)
    }

    async fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        self.remove(&filter, true, collection)
    }

    async fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        self.increment(name, collection)
    }
}

impl BlockingStoreBackend for InMemoryStore {
    fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        self.insert_document(document, collection)
    }

    fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        self.find_first(&filter, collection)
    }

    fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        self.find_all(&filter, limit, collection)
    }

    fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        self.update_first(&filter, &update, collection)
    }

    fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        self.remove(&filter, false, collection)
    }

    fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        self.remove(&filter, true, collection)
    }

    fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        self.increment(name, collection)
    }
}
