use bson::{Bson, Document, doc};
use mongodb::{
    options::ReturnDocument,
    sync::{Client, Collection as MongoCollection},
};
use tracing::info;

use mongocrud_core::{
    backend::{BlockingStoreBackend, BlockingStoreBackendBuilder, UpdateCounts},
    error::{CrudError, CrudResult},
};

use crate::{counter_value, cursor_limit};

/// Blocking MongoDB backend over the driver's [`mongodb::sync::Client`].
///
/// Must not be used from inside an async runtime's worker thread: the sync
/// client drives its own runtime and blocks the caller.
#[derive(Debug)]
pub struct BlockingMongoDbStore {
    client: Client,
    database: String,
}

impl BlockingMongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> BlockingMongoDbStoreBuilder {
        BlockingMongoDbStoreBuilder::new(dsn, database)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }
}

impl BlockingStoreBackend for BlockingMongoDbStore {
    fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        Ok(self
            .get_collection(collection)
            .insert_one(document)
            .run()
            .map_err(CrudError::backend)?
            .inserted_id)
    }

    fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(filter)
            .run()
            .map_err(CrudError::backend)
    }

    fn find(
        &self,
        filter: Document,
        limit: Option<usize>,
        collection: &str,
    ) -> CrudResult<Vec<Document>> {
        let collection = self.get_collection(collection);
        let mut find = collection.find(filter);

        if let Some(limit) = cursor_limit(limit) {
            find = find.limit(limit);
        }

        find.run()
            .map_err(CrudError::backend)?
            .collect::<Result<Vec<Document>, _>>()
            .map_err(CrudError::backend)
    }

    fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        let result = self
            .get_collection(collection)
            .update_one(filter, update)
            .run()
            .map_err(CrudError::backend)?;

        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        Ok(self
            .get_collection(collection)
            .delete_one(filter)
            .run()
            .map_err(CrudError::backend)?
            .deleted_count)
    }

    fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        Ok(self
            .get_collection(collection)
            .delete_many(filter)
            .run()
            .map_err(CrudError::backend)?
            .deleted_count)
    }

    fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        let counter = self
            .get_collection(collection)
            .find_one_and_update(
                doc! { "_id": name },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .run()
            .map_err(CrudError::backend)?;

        counter_value(name, counter)
    }
}

pub struct BlockingMongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl BlockingMongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

impl BlockingStoreBackendBuilder for BlockingMongoDbStoreBuilder {
    type Backend = BlockingMongoDbStore;

    fn build(self) -> CrudResult<Self::Backend> {
        let client = Client::with_uri_str(&self.dsn).map_err(CrudError::initialization)?;

        info!(database = %self.database, "created blocking MongoDB client");

        Ok(BlockingMongoDbStore::new(client, self.database))
    }
}
