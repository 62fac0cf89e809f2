//! Update-operator application for in-memory documents.
//!
//! Supports `$set`, `$unset` and `$inc` with dotted paths. Updates are applied to a
//! copy so a failing operator leaves the stored document untouched.

use bson::{Bson, Document};

use mongocrud_core::error::{CrudError, CrudResult};

use crate::evaluator::{lookup, values_equal};

/// Applies `update` to `document`, returning the updated copy and whether anything changed.
///
/// # Errors
///
/// [`CrudError::InvalidUpdate`] when the update has no operators, targets `_id`
/// with a different value, or increments a non-numeric field;
/// [`CrudError::UnsupportedOperator`] for operators other than `$set`, `$unset`, `$inc`.
pub(crate) fn apply_update(document: &Document, update: &Document) -> CrudResult<(Document, bool)> {
    if update.is_empty() || update.keys().any(|key| !key.starts_with('$')) {
        return Err(CrudError::InvalidUpdate(
            "update document requires atomic operators".to_string(),
        ));
    }

    let mut updated = document.clone();

    for (operator, fields) in update {
        let fields = fields
            .as_document()
            .ok_or_else(|| CrudError::InvalidUpdate(format!("{operator} requires a document")))?;

        for (path, value) in fields {
            if path == "_id" || path.starts_with("_id.") {
                let unchanged = operator == "$set"
                    && lookup(&updated, path).is_some_and(|id| values_equal(id, value));

                if !unchanged {
                    return Err(CrudError::InvalidUpdate(
                        "cannot modify immutable field '_id'".to_string(),
                    ));
                }
                continue;
            }

            match operator.as_str() {
                "$set" => set_path(&mut updated, path, value.clone())?,
                "$unset" => unset_path(&mut updated, path),
                "$inc" => {
                    let incremented = increment(lookup(&updated, path), value, path)?;
                    set_path(&mut updated, path, incremented)?;
                }
                other => return Err(CrudError::UnsupportedOperator(other.to_string())),
            }
        }
    }

    let changed = updated != *document;
    Ok((updated, changed))
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> CrudResult<()> {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            if !document.contains_key(head) {
                document.insert(head, Document::new());
            }

            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => Err(CrudError::InvalidUpdate(format!(
                    "cannot create field '{rest}' inside non-document field '{head}'"
                ))),
            }
        }
    }
}

fn unset_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(inner)) = document.get_mut(head) {
                unset_path(inner, rest);
            }
        }
    }
}

fn increment(current: Option<&Bson>, by: &Bson, path: &str) -> CrudResult<Bson> {
    let non_numeric = || {
        CrudError::InvalidUpdate(format!("cannot apply $inc to non-numeric value at '{path}'"))
    };

    Ok(match (current.unwrap_or(&Bson::Int32(0)), by) {
        (Bson::Int32(a), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(i64::from(*a) + i64::from(*b)),
        },
        (Bson::Int32(a), Bson::Int64(b)) => Bson::Int64(i64::from(*a).wrapping_add(*b)),
        (Bson::Int64(a), Bson::Int32(b)) => Bson::Int64(a.wrapping_add(i64::from(*b))),
        (Bson::Int64(a), Bson::Int64(b)) => Bson::Int64(a.wrapping_add(*b)),
        (Bson::Double(a), Bson::Double(b)) => Bson::Double(a + b),
        (Bson::Double(a), Bson::Int32(b)) => Bson::Double(a + f64::from(*b)),
        (Bson::Double(a), Bson::Int64(b)) => Bson::Double(a + *b as f64),
        (Bson::Int32(a), Bson::Double(b)) => Bson::Double(f64::from(*a) + b),
        (Bson::Int64(a), Bson::Double(b)) => Bson::Double(*a as f64 + b),
        _ => return Err(non_numeric()),
    })
}
