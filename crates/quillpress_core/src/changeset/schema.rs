//! Per-entity-type schema descriptors.
//!
//! # Responsibility
//! - Declare, once per entity type, which columns exist, which form the
//!   key, and which participate in audit diffs.
//! - Define the `Record` seam entities implement to join the save
//!   pipeline.
//!
//! # Invariants
//! - Descriptors are static data fixed at compile time; nothing is
//!   discovered reflectively per call.
//! - `Record::to_row` must yield exactly one value per schema column, in
//!   schema order.

use crate::model::ModelValidationError;
use rusqlite::types::Value;

/// One column of an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub is_key: bool,
    /// Columns with `false` are persisted but excluded from audit diffs.
    pub audited: bool,
}

impl ColumnDef {
    /// Declares a primary-key column.
    pub const fn key(name: &'static str) -> Self {
        Self {
            name,
            is_key: true,
            audited: true,
        }
    }

    /// Declares a business column that participates in audit diffs.
    pub const fn audited(name: &'static str) -> Self {
        Self {
            name,
            is_key: false,
            audited: true,
        }
    }

    /// Declares a column that is persisted but kept out of audit diffs.
    ///
    /// Used for the attribution metadata columns, which the audit record
    /// already captures through its own fields.
    pub const fn exempt(name: &'static str) -> Self {
        Self {
            name,
            is_key: false,
            audited: false,
        }
    }
}

/// Static schema descriptor for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Logical table name, also used as the audit `table_name`.
    pub table: &'static str,
    /// Columns in persistence order.
    pub columns: &'static [ColumnDef],
}

/// Seam between domain entities and the change-tracking save pipeline.
///
/// Implementors expose a static schema descriptor plus a value snapshot;
/// the session derives change sets, audit records and SQL from those two
/// pieces alone.
pub trait Record {
    /// Static schema descriptor for this entity type.
    fn schema() -> &'static EntitySchema
    where
        Self: Sized;

    /// Current column values, one per schema column, in schema order.
    fn to_row(&self) -> Vec<Value>;

    /// Domain validation executed before the entity is staged for write.
    fn validate(&self) -> Result<(), ModelValidationError> {
        Ok(())
    }
}
