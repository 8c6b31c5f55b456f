//! Generic row mutation from tracked change snapshots.
//!
//! # Responsibility
//! - Derive INSERT/UPDATE/DELETE statements from a `TrackedEntity` and
//!   execute them inside the caller's transaction.
//!
//! # Invariants
//! - UPDATE touches modified columns only; key columns never appear in a
//!   SET clause.
//! - WHERE clauses bind original key values.
//! - Unchanged/Detached entities are no-ops.

use crate::changeset::{EntityState, TrackedEntity};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Transaction};

/// Applies one tracked change to storage.
///
/// Returns the number of rows affected.
pub fn apply_change(tx: &Transaction<'_>, change: &TrackedEntity) -> RepoResult<usize> {
    match change.state {
        EntityState::Added => insert_row(tx, change),
        EntityState::Modified => update_row(tx, change),
        EntityState::Deleted => delete_row(tx, change),
        EntityState::Unchanged | EntityState::Detached => Ok(0),
    }
}

fn insert_row(tx: &Transaction<'_>, change: &TrackedEntity) -> RepoResult<usize> {
    let mut columns = Vec::with_capacity(change.properties.len());
    let mut binds: Vec<Value> = Vec::with_capacity(change.properties.len());
    for property in &change.properties {
        columns.push(property.name);
        binds.push(property.current.clone());
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        change.table,
        columns.join(", "),
        placeholders
    );

    Ok(tx.execute(&sql, params_from_iter(binds))?)
}

fn update_row(tx: &Transaction<'_>, change: &TrackedEntity) -> RepoResult<usize> {
    let mut assignments = Vec::new();
    let mut binds: Vec<Value> = Vec::new();
    for property in &change.properties {
        if !property.is_key && property.is_modified {
            assignments.push(format!("{} = ?", property.name));
            binds.push(property.current.clone());
        }
    }
    if assignments.is_empty() {
        return Ok(0);
    }

    let predicates = key_predicates(change, &mut binds)?;
    let sql = format!(
        "UPDATE {} SET {} WHERE {};",
        change.table,
        assignments.join(", "),
        predicates
    );

    let changed = tx.execute(&sql, params_from_iter(binds))?;
    if changed == 0 {
        return Err(RepoError::RowNotFound {
            table: change.table,
        });
    }
    Ok(changed)
}

fn delete_row(tx: &Transaction<'_>, change: &TrackedEntity) -> RepoResult<usize> {
    let mut binds: Vec<Value> = Vec::new();
    let predicates = key_predicates(change, &mut binds)?;
    let sql = format!("DELETE FROM {} WHERE {};", change.table, predicates);

    let changed = tx.execute(&sql, params_from_iter(binds))?;
    if changed == 0 {
        return Err(RepoError::RowNotFound {
            table: change.table,
        });
    }
    Ok(changed)
}

fn key_predicates(change: &TrackedEntity, binds: &mut Vec<Value>) -> RepoResult<String> {
    let mut predicates = Vec::new();
    for property in &change.properties {
        if property.is_key {
            predicates.push(format!("{} = ?", property.name));
            binds.push(property.original.clone());
        }
    }
    if predicates.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "no key columns staged for table `{}`",
            change.table
        )));
    }
    Ok(predicates.join(" AND "))
}
