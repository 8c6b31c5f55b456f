//! Audit record construction from a pending change set.
//!
//! # Responsibility
//! - Classify each tracked entity and capture key/old/new values.
//!
//! # Invariants
//! - Key columns always land in `key_values`, never in diffs.
//! - Modified entities with no audited column diff produce no record.
//! - A tracked entity without key column values aborts capture before
//!   any write happens.

use super::{Actor, AuditKind, AuditRecord, AUDIT_TABLE};
use crate::changeset::{ChangeSetError, EntityState, TrackedEntity};
use rusqlite::types::Value;
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

/// Builds audit records for one pending commit.
///
/// Entities in `Unchanged`/`Detached` state and changes to the audit
/// table itself are skipped. Records come back in the order entities were
/// encountered; columns inside each record follow schema order.
///
/// # Errors
/// - `ChangeSetError::MissingKey` when a tracked entity would produce an
///   empty `key_values` map.
pub fn build_audit_entries(
    changes: &[TrackedEntity],
    actor: Option<&Actor>,
    recorded_at_epoch_ms: i64,
) -> Result<Vec<AuditRecord>, ChangeSetError> {
    let mut records = Vec::new();

    for change in changes {
        if change.table == AUDIT_TABLE {
            continue;
        }
        let kind = match change.state {
            EntityState::Added => AuditKind::Create,
            EntityState::Modified => AuditKind::Update,
            EntityState::Deleted => AuditKind::Delete,
            EntityState::Unchanged | EntityState::Detached => continue,
        };

        let mut key_values = Map::new();
        let mut old_values = Map::new();
        let mut new_values = Map::new();
        let mut changed_columns = Vec::new();

        for property in &change.properties {
            if property.is_key {
                key_values.insert(property.name.to_string(), value_to_json(&property.current));
                continue;
            }
            if !property.audited {
                continue;
            }
            match kind {
                AuditKind::Create => {
                    new_values.insert(property.name.to_string(), value_to_json(&property.current));
                }
                AuditKind::Delete => {
                    old_values.insert(property.name.to_string(), value_to_json(&property.original));
                }
                AuditKind::Update => {
                    if property.is_modified {
                        changed_columns.push(property.name.to_string());
                        old_values
                            .insert(property.name.to_string(), value_to_json(&property.original));
                        new_values
                            .insert(property.name.to_string(), value_to_json(&property.current));
                    }
                }
            }
        }

        if key_values.is_empty() {
            return Err(ChangeSetError::MissingKey {
                table: change.table,
            });
        }
        // A relationship-only or metadata-only touch carries no audited diff.
        if kind == AuditKind::Update && changed_columns.is_empty() {
            continue;
        }

        records.push(AuditRecord {
            id: Uuid::new_v4(),
            table_name: change.table.to_string(),
            kind,
            key_values,
            old_values,
            new_values,
            changed_columns,
            user_id: actor.map(|actor| actor.user_id.clone()),
            user_name: actor.map(|actor| actor.user_name.clone()),
            recorded_at: recorded_at_epoch_ms,
        });
    }

    Ok(records)
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(value) => JsonValue::Number(Number::from(*value)),
        Value::Real(value) => Number::from_f64(*value)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(value) => JsonValue::String(value.clone()),
        Value::Blob(bytes) => JsonValue::Array(
            bytes
                .iter()
                .map(|byte| JsonValue::Number(Number::from(*byte)))
                .collect(),
        ),
    }
}
