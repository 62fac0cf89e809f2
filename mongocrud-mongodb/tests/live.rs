//! Round trips against a running MongoDB server.
//!
//! Ignored by default; run with `cargo test -p mongocrud-mongodb -- --ignored`
//! and point `MONGOCRUD_TEST_URI` at a disposable server.

use bson::{doc, oid::ObjectId};
use mongocrud_core::{
    config::{CollectionNames, CrudConfig},
    crud::{AsyncCrud, Crud},
    query::QueryMode,
};
use mongocrud_mongodb::{connect, connect_blocking};

fn config() -> CrudConfig {
    let suffix = ObjectId::new().to_hex();

    let uri = std::env::var("MONGOCRUD_TEST_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string());

    CrudConfig::default()
        .with_uri(uri)
        .with_database("mongocrud_test")
        .with_collections(CollectionNames {
            documents: format!("people_{suffix}"),
            counters: format!("counters_{suffix}"),
        })
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn async_store_round_trip() {
    let config = config();
    let store = connect(&config).await.unwrap();

    let created = store.create(doc! { "id": 0, "name": "Alice" }).await.unwrap();
    store.create(doc! { "id": 1, "name": "Alice" }).await.unwrap();

    let found = store.read(doc! { "_id": created.id.clone() }, QueryMode::One, None).await.unwrap();
    assert_eq!(found.first().and_then(|d| d.get_str("name").ok()), Some("Alice"));

    let updated = store.update(doc! { "name": "Alice" }, doc! { "age": 31 }).await.unwrap();
    assert_eq!(updated.modified, 1);

    let limited = store.read(doc! { "name": "Alice" }, QueryMode::Many, Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);

    assert_eq!(store.next_sequence("people").await.unwrap().value, 1);
    assert_eq!(store.next_sequence("people").await.unwrap().value, 2);

    let deleted = store.delete(doc! { "name": "Alice" }, QueryMode::Many).await.unwrap();
    assert_eq!(deleted.deleted, 2);

    let database = store.backend().client().database(&config.database);
    database.collection::<bson::Document>(&config.collections.documents).drop().await.unwrap();
    database.collection::<bson::Document>(&config.collections.counters).drop().await.unwrap();
    store.shutdown().await.unwrap();
}

#[test]
#[ignore = "requires a MongoDB server"]
fn blocking_store_round_trip() {
    let config = config();
    let store = connect_blocking(&config).unwrap();

    store.create(doc! { "id": 0, "name": "Bob" }).unwrap();
    store.create(doc! { "id": 1, "name": "Bob" }).unwrap();

    assert_eq!(store.delete(doc! { "name": "Bob" }, QueryMode::One).unwrap().deleted, 1);
    assert_eq!(store.read(doc! { "name": "Bob" }, QueryMode::Many, None).unwrap().len(), 1);
    assert!(store.read(doc! { "name": "Nobody" }, QueryMode::One, None).unwrap().is_empty());

    let database = store.backend().client().database(&config.database);
    database.collection::<bson::Document>(&config.collections.documents).drop().run().unwrap();
}
