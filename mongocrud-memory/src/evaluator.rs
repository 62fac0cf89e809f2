//! Filter evaluation for in-memory documents.
//!
//! Walks an [`Expr`] against a single document, approximating MongoDB's matching
//! rules: numbers compare across integer and float types, array fields match
//! when any element matches, and a missing field equals `null`.

use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};
use std::cmp::Ordering;

use mongocrud_core::{
    error::{CrudError, CrudResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Comparable view of a BSON value.
///
/// Integers keep their exact value and only meet floats through
/// [`compare_int_double`]. Embedded documents keep their field order. Types
/// without a dedicated variant compare by plain BSON equality and never order.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    DateTime(DateTime),
    ObjectId(ObjectId),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Document(Vec<(&'a str, Comparable<'a>)>),
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Document(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            other => Comparable::Other(other),
        }
    }
}

/// Exact ordering between an integer and a float.
fn compare_int_double(int: i64, double: f64) -> Option<Ordering> {
    // 2^63, the first float above i64::MAX
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if double.is_nan() {
        return None;
    }
    if double >= BOUND {
        return Some(Ordering::Less);
    }
    if double < -BOUND {
        return Some(Ordering::Greater);
    }

    let whole = double.trunc();
    Some(int.cmp(&(whole as i64)).then_with(|| {
        let fraction = double - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }))
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(a), Comparable::Double(b)) => {
                compare_int_double(*a, *b) == Some(Ordering::Equal)
            }
            (Comparable::Double(a), Comparable::Int(b)) => {
                compare_int_double(*b, *a) == Some(Ordering::Equal)
            }
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Document(a), Comparable::Document(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Comparable<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Int(b)) => a.partial_cmp(b),
            (Comparable::Double(a), Comparable::Double(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Double(b)) => compare_int_double(*a, *b),
            (Comparable::Double(a), Comparable::Int(b)) => {
                compare_int_double(*b, *a).map(Ordering::reverse)
            }
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// BSON equality with numeric normalization, as used for `_id` uniqueness.
pub(crate) fn values_equal(left: &Bson, right: &Bson) -> bool {
    Comparable::from(left) == Comparable::from(right)
}

/// Resolves a dotted path such as `address.city` inside `document`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> CrudResult<bool> {
        self.visit_expr(expr)
    }

    /// Equality where an array field also matches any of its elements.
    fn field_equals(field_value: &Bson, value: &Bson) -> bool {
        if values_equal(field_value, value) {
            return true;
        }

        match field_value {
            Bson::Array(items) => items.iter().any(|item| values_equal(item, value)),
            _ => false,
        }
    }

    fn field_compares(field_value: &Bson, op: FieldOp, value: &Bson) -> bool {
        let bound = Comparable::from(value);
        let satisfies = |candidate: &Bson| match Comparable::from(candidate).partial_cmp(&bound) {
            Some(ordering) => match op {
                FieldOp::Gt => ordering == Ordering::Greater,
                FieldOp::Gte => ordering != Ordering::Less,
                FieldOp::Lt => ordering == Ordering::Less,
                FieldOp::Lte => ordering != Ordering::Greater,
                _ => false,
            },
            None => false,
        };

        match field_value {
            Bson::Array(items) => items.iter().any(satisfies),
            other => satisfies(other),
        }
    }
}

impl QueryVisitor for DocumentEvaluator<'_> {
    type Output = bool;
    type Error = CrudError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error> {
        Ok(lookup(self.document, field).is_some() == should_exist)
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        let missing = Bson::Null;
        let field_value = lookup(self.document, field).unwrap_or(&missing);

        Ok(match op {
            FieldOp::Eq => Self::field_equals(field_value, value),
            FieldOp::Ne => !Self::field_equals(field_value, value),
            FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                lookup(self.document, field).is_some()
                    && Self::field_compares(field_value, op, value)
            }
            FieldOp::In | FieldOp::Nin => {
                let listed = value.as_array().is_some_and(|values| {
                    values
                        .iter()
                        .any(|candidate| Self::field_equals(field_value, candidate))
                });

                (op == FieldOp::In) == listed
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Binary, Decimal128, doc, spec::BinarySubtype};

    fn blob(bytes: &[u8]) -> Bson {
        Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: bytes.to_vec() })
    }

    fn matches(document: &Document, filter: Document) -> bool {
        DocumentEvaluator::new(document)
            .evaluate(&Expr::from_filter(&filter).unwrap())
            .unwrap()
    }

    #[test]
    fn equality_normalizes_numbers() {
        let alice = doc! { "id": 0_i64, "name": "Alice" };

        assert!(matches(&alice, doc! { "id": 0 }));
        assert!(matches(&alice, doc! { "id": 0.0 }));
        assert!(!matches(&alice, doc! { "id": 1 }));
    }

    #[test]
    fn empty_filter_matches_any_document() {
        assert!(matches(&doc! { "name": "Bob" }, doc! {}));
    }

    #[test]
    fn missing_fields_equal_null() {
        let bob = doc! { "name": "Bob" };

        assert!(matches(&bob, doc! { "age": null }));
        assert!(!matches(&bob, doc! { "age": { "$gt": 0 } }));
        assert!(matches(&bob, doc! { "age": { "$ne": 31 } }));
    }

    #[test]
    fn array_fields_match_by_membership() {
        let doc = doc! { "tags": ["admin", "ops"] };

        assert!(matches(&doc, doc! { "tags": "ops" }));
        assert!(matches(&doc, doc! { "tags": ["admin", "ops"] }));
        assert!(matches(&doc, doc! { "tags": { "$in": ["dev", "admin"] } }));
        assert!(matches(&doc, doc! { "tags": { "$nin": ["dev"] } }));
    }

    #[test]
    fn comparisons_and_logic() {
        let doc = doc! { "name": "Alice", "age": 31 };

        assert!(matches(&doc, doc! { "age": { "$gte": 31, "$lt": 40 } }));
        assert!(matches(&doc, doc! { "$or": [{ "name": "Bob" }, { "age": { "$gt": 30 } }] }));
        assert!(!matches(&doc, doc! { "$nor": [{ "name": "Alice" }] }));
        assert!(matches(&doc, doc! { "age": { "$not": { "$lt": 18 } } }));
    }

    #[test]
    fn dotted_paths_reach_into_embedded_documents() {
        let doc = doc! { "address": { "city": "Oslo", "zip": 150 } };

        assert!(matches(&doc, doc! { "address.city": "Oslo" }));
        assert!(matches(&doc, doc! { "address.zip": { "$exists": true } }));
        assert!(matches(&doc, doc! { "address.street": { "$exists": false } }));
    }

    #[test]
    fn object_ids_compare_by_value() {
        let id = ObjectId::new();
        let doc = doc! { "_id": id };

        assert!(matches(&doc, doc! { "_id": id }));
        assert!(!matches(&doc, doc! { "_id": ObjectId::new() }));
    }

    #[test]
    fn binary_values_are_not_null() {
        let doc = doc! { "_id": 1, "blob": blob(&[1]) };

        assert!(!matches(&doc, doc! { "blob": null }));
        assert!(matches(&doc, doc! { "blob": blob(&[1]) }));
        assert!(!matches(&doc, doc! { "blob": blob(&[2]) }));
        assert!(!values_equal(&blob(&[1]), &blob(&[2])));
    }

    #[test]
    fn decimals_compare_by_value_only_with_decimals() {
        let one = Bson::Decimal128(Decimal128::from_bytes([1; 16]));
        let two = Bson::Decimal128(Decimal128::from_bytes([2; 16]));

        assert!(values_equal(&one, &one.clone()));
        assert!(!values_equal(&one, &two));
        assert!(!values_equal(&one, &Bson::Null));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let big = 9_007_199_254_740_992_i64;
        let doc = doc! { "_id": big + 1 };

        assert!(!values_equal(&Bson::Int64(big), &Bson::Int64(big + 1)));
        assert!(matches(&doc, doc! { "_id": big + 1 }));
        assert!(!matches(&doc, doc! { "_id": big }));
        assert!(matches(&doc, doc! { "_id": { "$gt": big } }));
        assert!(matches(&doc! { "n": 7 }, doc! { "n": 7_i64 }));
    }

    #[test]
    fn integers_and_doubles_order_exactly() {
        let doc = doc! { "n": 3 };

        assert!(matches(&doc, doc! { "n": { "$gt": 2.5 } }));
        assert!(matches(&doc, doc! { "n": { "$lt": 3.5 } }));
        assert!(matches(&doc, doc! { "n": { "$gte": 3.0, "$lte": 3.0 } }));
        assert!(!matches(&doc, doc! { "n": 3.1 }));
        assert!(!matches(&doc! { "n": i64::MAX }, doc! { "n": { "$gte": 9.3e18 } }));
        assert!(!matches(&doc, doc! { "n": { "$gt": f64::NAN } }));
    }

    #[test]
    fn embedded_document_equality_respects_field_order() {
        let doc = doc! { "a": { "x": 1, "y": 2 } };

        assert!(matches(&doc, doc! { "a": { "x": 1, "y": 2 } }));
        assert!(!matches(&doc, doc! { "a": { "y": 2, "x": 1 } }));
    }
}
