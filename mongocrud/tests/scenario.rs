use bson::doc;
use mongocrud::{
    config::DEFAULT_COLLECTION,
    demo::{run_demo, run_demo_async},
    memory::InMemoryStore,
    prelude::*,
};

fn names(store: &InMemoryStore) -> Vec<String> {
    store
        .documents(DEFAULT_COLLECTION)
        .iter()
        .map(|d| d.get_str("name").unwrap().to_string())
        .collect()
}

#[test]
fn alice_and_bob_lifecycle() {
    let backend = InMemoryStore::new();
    let store = BlockingDocumentStore::new(backend.clone());
    let alice = doc! { "id": 0, "name": "Alice" };
    let bob = doc! { "id": 1, "name": "Bob" };

    store.create(alice.clone()).unwrap();
    store.create(bob.clone()).unwrap();
    store.delete(doc! { "name": "Alice" }, QueryMode::Many).unwrap();
    store.delete(doc! { "name": "Bob" }, QueryMode::One).unwrap();
    assert!(backend.documents(DEFAULT_COLLECTION).is_empty());

    store.create(alice).unwrap();
    store.create(bob).unwrap();

    let found = store.read_many(doc! { "name": "Alice" }, None).unwrap().into_documents();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_i32("id").unwrap(), 0);

    store.update(doc! { "name": "Alice" }, doc! { "age": 31 }).unwrap();
    let updated = store.read_one(doc! { "id": 0 }).unwrap();
    assert_eq!(updated.first().and_then(|d| d.get_i32("age").ok()), Some(31));

    store.delete(doc! { "name": "Alice" }, QueryMode::One).unwrap();
    assert_eq!(store.read_one(doc! { "name": "Alice" }).unwrap(), ReadOutcome::One(None));
    assert_eq!(names(&backend), ["Bob"]);
}

#[test]
fn blocking_demo_leaves_only_bob() {
    let backend = InMemoryStore::new();
    let store = BlockingDocumentStore::new(backend.clone());

    run_demo(&store).unwrap();

    assert_eq!(names(&backend), ["Bob"]);
    assert!(backend.documents(DEFAULT_COLLECTION)[0].get("surname").is_none());
}

#[test]
fn blocking_demo_is_repeatable() {
    let backend = InMemoryStore::new();
    let store = BlockingDocumentStore::new(backend.clone());

    run_demo(&store).unwrap();
    run_demo(&store).unwrap();

    assert_eq!(names(&backend), ["Bob"]);
}

#[tokio::test]
async fn async_demo_leaves_only_bob() {
    let backend = InMemoryStore::new();
    let store = DocumentStore::new(backend.clone());

    run_demo_async(&store).await.unwrap();
    run_demo_async(&store).await.unwrap();

    assert_eq!(names(&backend), ["Bob"]);
}
