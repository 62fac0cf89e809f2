//! Operation outcomes and their console rendering.
//!
//! Each outcome's `Display` implementation is the console message for that
//! operation, shared by the blocking and the async stores.

use bson::{Bson, Document};
use std::fmt;

/// Result of a `create` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// The identifier of the inserted document, generated or caller-supplied.
    pub id: Bson,
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inserted document with id: {}", self.id)
    }
}

/// Result of a `read` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// Single-document read; `None` when nothing matched.
    One(Option<Document>),
    /// Multi-document read, in the order the cursor produced them.
    Many(Vec<Document>),
}

impl ReadOutcome {
    /// Number of documents returned.
    pub fn len(&self) -> usize {
        match self {
            ReadOutcome::One(doc) => usize::from(doc.is_some()),
            ReadOutcome::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the outcome, yielding the returned documents.
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            ReadOutcome::One(doc) => doc.into_iter().collect(),
            ReadOutcome::Many(docs) => docs,
        }
    }

    /// The first returned document, if any.
    pub fn first(&self) -> Option<&Document> {
        match self {
            ReadOutcome::One(doc) => doc.as_ref(),
            ReadOutcome::Many(docs) => docs.first(),
        }
    }
}

impl fmt::Display for ReadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadOutcome::One(Some(doc)) => write!(f, "Found document: {doc}"),
            ReadOutcome::One(None) => write!(f, "Document not found."),
            ReadOutcome::Many(docs) if docs.is_empty() => write!(f, "No documents found."),
            ReadOutcome::Many(docs) => {
                write!(f, "Found {} document(s):", docs.len())?;
                for doc in docs {
                    write!(f, "\ndoc={doc}")?;
                }
                Ok(())
            }
        }
    }
}

/// Result of an `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Updated {
    /// Documents matched by the filter (0 or 1).
    pub matched: u64,
    /// Documents actually changed (0 or 1).
    pub modified: u64,
}

impl fmt::Display for Updated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modified {} document(s).", self.modified)
    }
}

/// Result of a `delete` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: u64,
}

impl fmt::Display for Deleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted {} document(s).", self.deleted)
    }
}

/// Result of a `next_sequence` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub value: i64,
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence {} advanced to {}.", self.name, self.value)
    }
}

/// Prints an outcome to stdout.
pub fn report(outcome: &impl fmt::Display) {
    println!("{outcome}");
}
