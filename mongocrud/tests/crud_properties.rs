use bson::{Bson, doc};
use mongocrud::{config::DEFAULT_COLLECTION, memory::InMemoryStore, prelude::*};

fn blocking_store() -> BlockingDocumentStore<InMemoryStore> {
    BlockingDocumentStore::new(InMemoryStore::new())
}

fn async_store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(InMemoryStore::new())
}

#[test]
fn created_documents_read_back_with_their_generated_id() {
    let store = blocking_store();

    let created = store.create(doc! { "id": 0, "name": "Alice" }).unwrap();
    let found = store.read(doc! { "_id": created.id.clone() }, QueryMode::One, None).unwrap();

    assert!(matches!(created.id, Bson::ObjectId(_)));
    assert_eq!(found, ReadOutcome::One(Some(doc! { "_id": created.id, "id": 0, "name": "Alice" })));
}

#[test]
fn caller_supplied_ids_are_kept_and_unique() {
    let store = blocking_store();

    let created = store.create(doc! { "_id": "alice", "name": "Alice" }).unwrap();
    let duplicate = store.create(doc! { "_id": "alice", "name": "Impostor" });

    assert_eq!(created.id, Bson::String("alice".to_string()));
    assert!(matches!(duplicate, Err(CrudError::DuplicateKey { .. })));
}

#[test]
fn update_merges_into_one_document_only() {
    let store = blocking_store();
    store.create(doc! { "id": 0, "name": "Alice", "team": "red" }).unwrap();
    store.create(doc! { "id": 1, "name": "Alice", "team": "blue" }).unwrap();

    let updated = store.update(doc! { "name": "Alice" }, doc! { "age": 31 }).unwrap();
    let first = store.read_one(doc! { "id": 0 }).unwrap().into_documents().remove(0);
    let second = store.read_one(doc! { "id": 1 }).unwrap().into_documents().remove(0);

    assert_eq!(updated, Updated { matched: 1, modified: 1 });
    assert_eq!(first.get_i32("age").unwrap(), 31);
    assert_eq!(first.get_str("team").unwrap(), "red");
    assert_eq!(first.get_str("name").unwrap(), "Alice");
    assert!(second.get("age").is_none());
}

#[test]
fn update_without_match_or_change_reports_zero() {
    let store = blocking_store();
    store.create(doc! { "id": 0, "age": 31 }).unwrap();

    assert_eq!(store.update(doc! { "id": 9 }, doc! { "age": 1 }).unwrap().modified, 0);
    assert_eq!(
        store.update(doc! { "id": 0 }, doc! { "age": 31 }).unwrap(),
        Updated { matched: 1, modified: 0 },
    );
}

#[test]
fn delete_modes_remove_one_or_all_matches() {
    let store = blocking_store();
    for id in 0..3 {
        store.create(doc! { "id": id, "name": "Bob" }).unwrap();
    }

    assert_eq!(store.delete(doc! { "name": "Bob" }, QueryMode::One).unwrap().deleted, 1);
    assert_eq!(store.read_many(doc! { "name": "Bob" }, None).unwrap().len(), 2);
    assert_eq!(store.delete(doc! { "name": "Bob" }, QueryMode::Many).unwrap().deleted, 2);
    assert_eq!(store.delete(doc! { "name": "Bob" }, QueryMode::Many).unwrap().deleted, 0);
}

#[test]
fn reading_nothing_is_not_an_error() {
    let store = blocking_store();

    assert_eq!(store.read_one(doc! { "name": "Nobody" }).unwrap(), ReadOutcome::One(None));
    assert_eq!(
        store.read_many(doc! { "name": "Nobody" }, None).unwrap(),
        ReadOutcome::Many(vec![]),
    );
}

#[test]
fn many_reads_respect_max_len_in_natural_order() {
    let store = blocking_store();
    for id in 0..5 {
        store.create(doc! { "id": id, "kind": "sample" }).unwrap();
    }

    let limited = store.read(doc! { "kind": "sample" }, QueryMode::Many, Some(3)).unwrap();
    let all = store.read(doc! { "kind": "sample" }, QueryMode::Many, None).unwrap();

    assert_eq!(
        limited.into_documents().iter().map(|d| d.get_i32("id").unwrap()).collect::<Vec<_>>(),
        [0, 1, 2],
    );
    assert_eq!(all.len(), 5);
}

#[test]
fn sequences_count_per_name() {
    let store = blocking_store();

    assert_eq!(store.next_sequence("people").unwrap().value, 1);
    assert_eq!(store.next_sequence("people").unwrap().value, 2);
    assert_eq!(store.next_sequence("orders").unwrap().value, 1);
    assert!(store.backend().documents(DEFAULT_COLLECTION).is_empty());
}

#[test]
fn driver_errors_propagate_unchanged() {
    let store = blocking_store();

    let err = store.read(doc! { "name": { "$regex": "^A" } }, QueryMode::One, None).unwrap_err();

    assert!(matches!(err, CrudError::UnsupportedOperator(op) if op == "$regex"));
}

#[tokio::test]
async fn async_store_honours_the_same_contract() {
    let store = async_store();

    let created = store.create(doc! { "id": 0, "name": "Alice" }).await.unwrap();
    store.create(doc! { "id": 1, "name": "Alice" }).await.unwrap();

    let found = store.read(doc! { "_id": created.id.clone() }, QueryMode::One, None).await.unwrap();
    assert_eq!(found.first().and_then(|d| d.get_str("name").ok()), Some("Alice"));

    let updated = store.update(doc! { "name": "Alice" }, doc! { "age": 31 }).await.unwrap();
    assert_eq!(updated.modified, 1);

    let limited = store.read(doc! { "name": "Alice" }, QueryMode::Many, Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);

    assert_eq!(store.delete(doc! { "name": "Alice" }, QueryMode::One).await.unwrap().deleted, 1);
    assert_eq!(store.delete(doc! { "name": "Alice" }, QueryMode::Many).await.unwrap().deleted, 1);
    assert_eq!(store.read_one(doc! { "name": "Alice" }).await.unwrap(), ReadOutcome::One(None));
    assert_eq!(store.next_sequence("people").await.unwrap().value, 1);
}

#[tokio::test]
async fn stores_over_cloned_backends_share_documents() {
    let backend = InMemoryStore::new();
    let blocking = BlockingDocumentStore::new(backend.clone());
    let asynchronous = DocumentStore::new(backend);

    blocking.create(doc! { "name": "Alice" }).unwrap();

    assert_eq!(asynchronous.read_many(doc! {}, None).await.unwrap().len(), 1);
}

#[test]
fn custom_collection_names_are_honoured() {
    let names = CollectionNames { documents: "people".to_string(), counters: "seqs".to_string() };
    let store = BlockingDocumentStore::with_collections(InMemoryStore::new(), names);

    store.create(doc! { "name": "Alice" }).unwrap();
    store.next_sequence("people").unwrap();

    assert_eq!(store.backend().documents("people").len(), 1);
    assert_eq!(store.backend().documents("seqs").len(), 1);
    assert!(store.backend().documents(DEFAULT_COLLECTION).is_empty());
}
