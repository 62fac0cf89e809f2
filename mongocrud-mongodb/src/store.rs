use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, ReturnDocument},
};
use tracing::info;

use mongocrud_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateCounts},
    error::{CrudError, CrudResult},
};

use crate::{counter_value, cursor_limit};

/// Asynchronous MongoDB backend over the driver's non-blocking [`Client`].
///
/// Every primitive awaits exactly one driver call; errors are passed on as
/// [`CrudError::Backend`] with the driver error as source.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
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

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, document: Document, collection: &str) -> CrudResult<Bson> {
        Ok(self
            .get_collection(collection)
            .insert_one(document)
            .await
            .map_err(CrudError::backend)?
            .inserted_id)
    }

    async fn find_one(&self, filter: Document, collection: &str) -> CrudResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(filter)
            .await
            .map_err(CrudError::backend)
    }

    async fn find(
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

        find.await
            .map_err(CrudError::backend)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(CrudError::backend)
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        collection: &str,
    ) -> CrudResult<UpdateCounts> {
        let result = self
            .get_collection(collection)
            .update_one(filter, update)
            .await
            .map_err(CrudError::backend)?;

        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        Ok(self
            .get_collection(collection)
            .delete_one(filter)
            .await
            .map_err(CrudError::backend)?
            .deleted_count)
    }

    async fn delete_many(&self, filter: Document, collection: &str) -> CrudResult<u64> {
        Ok(self
            .get_collection(collection)
            .delete_many(filter)
            .await
            .map_err(CrudError::backend)?
            .deleted_count)
    }

    async fn increment_counter(&self, name: &str, collection: &str) -> CrudResult<i64> {
        let counter = self
            .get_collection(collection)
            .find_one_and_update(
                doc! { "_id": name },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(CrudError::backend)?;

        counter_value(name, counter)
    }

    async fn shutdown(self) -> CrudResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> CrudResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(CrudError::initialization)?,
        )
        .map_err(CrudError::initialization)?;

        info!(database = %self.database, "created async MongoDB client");

        Ok(MongoDbStore::new(client, self.database))
    }
}
