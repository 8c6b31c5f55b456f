//! Audit trail persistence.
//!
//! # Responsibility
//! - Append audit records into the `audit_trail` table inside the
//!   caller's open transaction.
//!
//! # Invariants
//! - Appending participates in the enclosing transaction; rows become
//!   durable only when that transaction commits.
//! - Empty payload maps are stored as SQL NULL, not as `{}`.

use crate::audit::{AuditKind, AuditRecord};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Transaction};
use serde_json::{Map, Value as JsonValue};

/// SQLite-backed audit trail writer bound to one open transaction.
pub struct SqliteAuditTrailRepository<'tx> {
    tx: &'tx Transaction<'tx>,
}

impl<'tx> SqliteAuditTrailRepository<'tx> {
    pub fn new(tx: &'tx Transaction<'tx>) -> Self {
        Self { tx }
    }

    /// Appends all records; an empty slice is an idempotent no-op.
    ///
    /// Returns the number of rows staged.
    pub fn append(&self, records: &[AuditRecord]) -> RepoResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut stmt = self.tx.prepare(
            "INSERT INTO audit_trail (
                id,
                table_name,
                audit_kind,
                key_values,
                old_values,
                new_values,
                changed_columns,
                user_id,
                user_name,
                recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        )?;

        for record in records {
            let changed_columns = if record.changed_columns.is_empty() {
                None
            } else {
                Some(to_json_text(&JsonValue::from(record.changed_columns.clone()))?)
            };
            stmt.execute(params![
                record.id.to_string(),
                record.table_name.as_str(),
                kind_to_db(record.kind),
                map_to_json_text(&record.key_values)?,
                optional_map_to_json_text(&record.old_values)?,
                optional_map_to_json_text(&record.new_values)?,
                changed_columns,
                record.user_id.as_deref(),
                record.user_name.as_deref(),
                record.recorded_at,
            ])?;
        }

        Ok(records.len())
    }
}

fn kind_to_db(kind: AuditKind) -> &'static str {
    match kind {
        AuditKind::Create => "create",
        AuditKind::Update => "update",
        AuditKind::Delete => "delete",
    }
}

fn map_to_json_text(map: &Map<String, JsonValue>) -> RepoResult<String> {
    to_json_text(&JsonValue::Object(map.clone()))
}

fn optional_map_to_json_text(map: &Map<String, JsonValue>) -> RepoResult<Option<String>> {
    if map.is_empty() {
        Ok(None)
    } else {
        Ok(Some(map_to_json_text(map)?))
    }
}

fn to_json_text(value: &JsonValue) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("unserializable audit payload: {err}")))
}
