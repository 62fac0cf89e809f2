//! Query modes and a filter expression tree for backends that evaluate filters themselves.
//!
//! MongoDB receives filter documents untouched. Backends that have to evaluate a
//! filter in-process parse it into an [`Expr`] with [`Expr::from_filter`] and walk
//! it with a [`QueryVisitor`].
//!
//! # Supported filter syntax
//!
//! - Implicit equality: `{ "name": "Alice" }`
//! - Field operators: `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$nin`, `$exists`, `$not`
//! - Logical operators: `$and`, `$or`, `$nor`
//! - Dotted paths: `{ "address.city": "Oslo" }`

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::{CrudError, CrudResult};

/// Selects single- or multi-document semantics for read and delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Target the first matching document only.
    #[default]
    One,
    /// Target every matching document.
    Many,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Equal to. Array fields match when any element is equal.
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Field equals any of the listed values.
    In,
    /// Field equals none of the listed values.
    Nin,
}

impl FieldOp {
    fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            "$eq" => FieldOp::Eq,
            "$ne" => FieldOp::Ne,
            "$gt" => FieldOp::Gt,
            "$gte" => FieldOp::Gte,
            "$lt" => FieldOp::Lt,
            "$lte" => FieldOp::Lte,
            "$in" => FieldOp::In,
            "$nin" => FieldOp::Nin,
            _ => return None,
        })
    }
}

/// A filter expression over documents.
///
/// An empty `And` matches every document, which is what an empty filter
/// document parses to.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression.
    Not(Box<Expr>),
    /// Checks if a field exists or doesn't exist.
    Exists(String, bool),
    /// Field comparison expression.
    Field {
        /// The (possibly dotted) field path.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: impl Into<String>, op: FieldOp, value: impl Into<Bson>) -> Self {
        Expr::Field { field: field.into(), op, value: value.into() }
    }

    /// Parses a MongoDB-style filter document.
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::UnsupportedOperator`] for operators outside the supported
    /// set and [`CrudError::InvalidQuery`] for operands of the wrong shape.
    pub fn from_filter(filter: &Document) -> CrudResult<Self> {
        let mut clauses = filter
            .iter()
            .map(|(key, value)| match key.as_str() {
                "$and" => Ok(Expr::And(Self::parse_clauses(key, value)?)),
                "$or" => Ok(Expr::Or(Self::parse_clauses(key, value)?)),
                "$nor" => Ok(Expr::Not(Box::new(Expr::Or(Self::parse_clauses(key, value)?)))),
                operator if operator.starts_with('$') => {
                    Err(CrudError::UnsupportedOperator(operator.to_string()))
                }
                field => Self::parse_field(field, value),
            })
            .collect::<CrudResult<Vec<_>>>()?;

        Ok(match clauses.len() {
            1 => clauses.remove(0),
            _ => Expr::And(clauses),
        })
    }

    fn parse_clauses(operator: &str, value: &Bson) -> CrudResult<Vec<Expr>> {
        match value {
            Bson::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| match item {
                    Bson::Document(doc) => Self::from_filter(doc),
                    _ => Err(CrudError::InvalidQuery(format!(
                        "{operator} entries must be documents"
                    ))),
                })
                .collect(),
            _ => Err(CrudError::InvalidQuery(format!("{operator} requires a nonempty array"))),
        }
    }

    fn parse_field(field: &str, value: &Bson) -> CrudResult<Expr> {
        match value {
            Bson::Document(ops) if Self::is_operator_document(ops) => {
                let mut clauses = ops
                    .iter()
                    .map(|(operator, operand)| Self::parse_operator(field, operator, operand))
                    .collect::<CrudResult<Vec<_>>>()?;

                Ok(match clauses.len() {
                    1 => clauses.remove(0),
                    _ => Expr::And(clauses),
                })
            }
            _ => Ok(Expr::field(field, FieldOp::Eq, value.clone())),
        }
    }

    fn parse_operator(field: &str, operator: &str, operand: &Bson) -> CrudResult<Expr> {
        match operator {
            "$exists" => Ok(Expr::Exists(field.to_string(), Self::truthy(operand))),
            "$not" => match operand {
                Bson::Document(ops) if Self::is_operator_document(ops) => {
                    Ok(Expr::Not(Box::new(Self::parse_field(field, operand)?)))
                }
                _ => Err(CrudError::InvalidQuery("$not requires an operator document".to_string())),
            },
            "$in" | "$nin" if !matches!(operand, Bson::Array(_)) => {
                Err(CrudError::InvalidQuery(format!("{operator} requires an array")))
            }
            _ => match FieldOp::parse(operator) {
                Some(op) => Ok(Expr::field(field, op, operand.clone())),
                None => Err(CrudError::UnsupportedOperator(operator.to_string())),
            },
        }
    }

    fn is_operator_document(doc: &Document) -> bool {
        doc.keys().next().is_some_and(|key| key.starts_with('$'))
    }

    fn truthy(value: &Bson) -> bool {
        match value {
            Bson::Boolean(flag) => *flag,
            Bson::Int32(n) => *n != 0,
            Bson::Int64(n) => *n != 0,
            Bson::Double(n) => *n != 0.0,
            Bson::Null | Bson::Undefined => false,
            _ => true,
        }
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<CrudError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, *op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn query_mode_defaults_to_one() {
        assert_eq!(QueryMode::default(), QueryMode::One);
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(Expr::from_filter(&doc! {}).unwrap(), Expr::And(vec![]));
    }

    #[test]
    fn plain_values_become_equality() {
        assert_eq!(
            Expr::from_filter(&doc! { "name": "Alice" }).unwrap(),
            Expr::field("name", FieldOp::Eq, "Alice"),
        );
    }

    #[test]
    fn several_fields_are_conjunctive() {
        let filter = doc! { "name": "Alice", "age": { "$gte": 30, "$lt": 40 } };
        let expr = Expr::from_filter(&filter).unwrap();

        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::field("name", FieldOp::Eq, "Alice"),
                Expr::And(vec![
                    Expr::field("age", FieldOp::Gte, 30),
                    Expr::field("age", FieldOp::Lt, 40),
                ]),
            ]),
        );
    }

    #[test]
    fn embedded_documents_without_operators_compare_by_value() {
        let expr = Expr::from_filter(&doc! { "address": { "city": "Oslo" } }).unwrap();

        assert_eq!(expr, Expr::field("address", FieldOp::Eq, doc! { "city": "Oslo" }));
    }

    #[test]
    fn logical_operators_nest() {
        let expr = Expr::from_filter(&doc! {
            "$or": [{ "name": "Alice" }, { "name": { "$exists": false } }],
        })
        .unwrap();

        assert_eq!(
            expr,
            Expr::Or(vec![
                Expr::field("name", FieldOp::Eq, "Alice"),
                Expr::Exists("name".to_string(), false),
            ]),
        );
    }

    #[test]
    fn nor_is_negated_or() {
        let expr = Expr::from_filter(&doc! { "$nor": [{ "id": 0 }] }).unwrap();

        assert_eq!(expr, Expr::Not(Box::new(Expr::Or(vec![Expr::field("id", FieldOp::Eq, 0)]))));
    }

    #[test]
    fn unknown_operators_are_rejected() {
        assert!(matches!(
            Expr::from_filter(&doc! { "name": { "$regex": "^A" } }),
            Err(CrudError::UnsupportedOperator(op)) if op == "$regex"
        ));
        assert!(matches!(
            Expr::from_filter(&doc! { "$where": "true" }),
            Err(CrudError::UnsupportedOperator(op)) if op == "$where"
        ));
    }

    #[test]
    fn in_requires_an_array() {
        assert!(matches!(
            Expr::from_filter(&doc! { "id": { "$in": 1 } }),
            Err(CrudError::InvalidQuery(_))
        ));
    }
}
