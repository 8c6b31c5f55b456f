//! Tracked entity/property value structures.
//!
//! # Responsibility
//! - Describe one entity's mutation inside a pending commit.
//!
//! # Invariants
//! - `TrackedProperty::is_modified` reflects `original != current` at the
//!   time the change set was captured; consumers trust the flag rather
//!   than re-diffing.

use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation state of one entity within a pending commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Will be inserted by this commit.
    Added,
    /// Exists and has (or may have) column-level changes.
    Modified,
    /// Will be removed by this commit.
    Deleted,
    /// Tracked but carries no changes.
    Unchanged,
    /// No longer tracked; ignored by the commit.
    Detached,
}

/// One column of a tracked entity, with before/after values.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedProperty {
    /// Column name as declared in the entity schema.
    pub name: &'static str,
    /// Whether this column participates in the entity's identity.
    pub is_key: bool,
    /// Whether this column participates in audit diffs. Attribution
    /// metadata columns are persisted but carry `false` here.
    pub audited: bool,
    /// Value before the mutation. `Null` for added entities.
    pub original: Value,
    /// Value after the mutation. Equals `original` for deleted entities.
    pub current: Value,
    /// Whether `current` differs from `original`.
    pub is_modified: bool,
}

/// One entity's mutation inside a pending commit.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    /// Logical table name of the entity type.
    pub table: &'static str,
    /// Mutation state driving audit classification.
    pub state: EntityState,
    /// Columns in schema order.
    pub properties: Vec<TrackedProperty>,
}

/// Contract violation inside a supplied change set.
///
/// Raised before any write is attempted, so a malformed change set can
/// never produce a partially audited commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetError {
    /// A tracked entity exposes no key column values.
    MissingKey { table: &'static str },
}

impl Display for ChangeSetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey { table } => {
                write!(f, "tracked entity for table `{table}` carries no key columns")
            }
        }
    }
}

impl Error for ChangeSetError {}
