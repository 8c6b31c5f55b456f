//! Snapshot capture and change detection for tracked entities.
//!
//! # Responsibility
//! - Turn entity values into `TrackedEntity` change descriptions.
//! - Detect column-level modifications by comparing snapshots.
//!
//! # Invariants
//! - An update whose two snapshots are identical is recorded as
//!   `Unchanged`, never `Modified`.
//! - Deleted entities keep their last known values in `current`, so key
//!   extraction works uniformly across all states.

use super::schema::Record;
use super::tracked::{EntityState, TrackedEntity, TrackedProperty};
use rusqlite::types::Value;

/// Captures an entity that will be inserted by the commit.
pub fn track_added<R: Record>(entity: &R) -> TrackedEntity {
    let schema = R::schema();
    let properties = schema
        .columns
        .iter()
        .zip(entity.to_row())
        .map(|(column, value)| TrackedProperty {
            name: column.name,
            is_key: column.is_key,
            audited: column.audited,
            original: Value::Null,
            current: value,
            is_modified: false,
        })
        .collect();

    TrackedEntity {
        table: schema.table,
        state: EntityState::Added,
        properties,
    }
}

/// Captures an entity update from before/after snapshots.
///
/// When no column differs the entity is recorded as `Unchanged` and the
/// save pipeline will skip it entirely.
pub fn track_modified<R: Record>(before: &R, after: &R) -> TrackedEntity {
    let schema = R::schema();
    let properties: Vec<TrackedProperty> = schema
        .columns
        .iter()
        .zip(before.to_row().into_iter().zip(after.to_row()))
        .map(|(column, (original, current))| TrackedProperty {
            name: column.name,
            is_key: column.is_key,
            audited: column.audited,
            is_modified: original != current,
            original,
            current,
        })
        .collect();

    let state = if properties.iter().any(|property| property.is_modified) {
        EntityState::Modified
    } else {
        EntityState::Unchanged
    };

    TrackedEntity {
        table: schema.table,
        state,
        properties,
    }
}

/// Captures an entity that will be removed by the commit.
pub fn track_deleted<R: Record>(entity: &R) -> TrackedEntity {
    let schema = R::schema();
    let properties = schema
        .columns
        .iter()
        .zip(entity.to_row())
        .map(|(column, value)| TrackedProperty {
            name: column.name,
            is_key: column.is_key,
            audited: column.audited,
            original: value.clone(),
            current: value,
            is_modified: false,
        })
        .collect();

    TrackedEntity {
        table: schema.table,
        state: EntityState::Deleted,
        properties,
    }
}
