//! Change-audit records and capture.
//!
//! # Responsibility
//! - Define the immutable audit record emitted for every entity change.
//! - Translate pending change sets into audit records (see `builder`).
//!
//! # Invariants
//! - One record per changed entity per commit; records are append-only
//!   and never mutated after construction.
//! - `key_values` is never empty for an emitted record.
//! - Changes to the audit table itself are never captured.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

pub mod builder;

pub use builder::build_audit_entries;

/// Logical table name audit records are persisted under, and the one
/// table excluded from capture.
pub const AUDIT_TABLE: &str = "audit_trail";

/// Identity of the actor performing a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }
}

/// Classification of one audited entity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    Create,
    Update,
    Delete,
}

/// Immutable record of one entity change within one commit.
///
/// JSON maps keep first-seen (schema) column order, so audit output is
/// reproducible across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Primary key of the audit row itself.
    pub id: Uuid,
    /// Logical table name of the changed entity.
    pub table_name: String,
    pub kind: AuditKind,
    /// Key column values, always populated regardless of `kind`.
    pub key_values: Map<String, JsonValue>,
    /// Changed columns for `Update`, full audited column set for `Delete`.
    pub old_values: Map<String, JsonValue>,
    /// Changed columns for `Update`, full audited column set for `Create`.
    pub new_values: Map<String, JsonValue>,
    /// Audited non-key columns whose value changed; `Update` only.
    pub changed_columns: Vec<String>,
    /// Actor attribution; `None` denotes an unauthenticated mutation.
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    /// Commit timestamp, epoch milliseconds.
    pub recorded_at: i64,
}
