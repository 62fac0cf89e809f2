//! Scripted demonstration of the CRUD contract.
//!
//! Both functions run the same fixed sequence against two sample documents and
//! rely on the stores' console output for inspection. They assert nothing;
//! the first error aborts the run and is returned.

use bson::{Document, doc};

use mongocrud_core::{
    crud::{AsyncCrud, Crud},
    error::CrudResult,
    query::QueryMode,
};

fn alice() -> Document {
    doc! { "id": 0, "name": "Alice" }
}

fn bob() -> Document {
    doc! { "id": 1, "name": "Bob" }
}

/// Runs the demo sequence on a blocking store.
pub fn run_demo<C: Crud>(crud: &C) -> CrudResult<()> {
    // Clear leftovers from earlier runs.
    crud.delete(doc! { "name": "Alice" }, QueryMode::Many)?;
    crud.delete(doc! { "name": "Bob" }, QueryMode::One)?;

    crud.create(alice())?;
    crud.create(bob())?;
    crud.read(doc! { "name": "Alice" }, QueryMode::One, None)?;
    crud.read(doc! { "name": "Alice" }, QueryMode::Many, None)?;

    crud.update(doc! { "name": "Alice" }, doc! { "age": 31 })?;
    crud.read(doc! { "id": 0 }, QueryMode::One, None)?;
    crud.read(doc! { "id": 1 }, QueryMode::One, None)?;

    crud.delete(doc! { "name": "Alice" }, QueryMode::One)?;
    crud.read(doc! { "name": "Alice" }, QueryMode::One, None)?;

    // Generated ids are ObjectIds, so this matches nothing.
    crud.update(doc! { "_id": 1 }, doc! { "surname": "coder" })?;

    Ok(())
}

/// Runs the demo sequence on an async store, awaiting each call before the next.
pub async fn run_demo_async<C: AsyncCrud>(crud: &C) -> CrudResult<()> {
    crud.delete(doc! { "name": "Alice" }, QueryMode::Many).await?;
    crud.delete(doc! { "name": "Bob" }, QueryMode::One).await?;

    crud.create(alice()).await?;
    crud.create(bob()).await?;
    crud.read(doc! { "name": "Alice" }, QueryMode::One, None).await?;
    crud.read(doc! { "name": "Alice" }, QueryMode::Many, None).await?;

    crud.update(doc! { "name": "Alice" }, doc! { "age": 31 }).await?;
    crud.read(doc! { "id": 0 }, QueryMode::One, None).await?;
    crud.read(doc! { "id": 1 }, QueryMode::One, None).await?;

    crud.delete(doc! { "name": "Alice" }, QueryMode::One).await?;
    crud.read(doc! { "name": "Alice" }, QueryMode::One, None).await?;

    crud.update(doc! { "_id": 1 }, doc! { "surname": "coder" }).await?;

    Ok(())
}
