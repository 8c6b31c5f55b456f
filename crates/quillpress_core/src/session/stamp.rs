//! Attribution metadata stamping.
//!
//! # Responsibility
//! - Write created/updated timestamps and actor ids into pending change
//!   snapshots before audit capture consumes them.
//!
//! # Invariants
//! - Added entities receive `created_at`/`created_by`; modified entities
//!   receive `updated_at`/`updated_by`; deleted entities are untouched.
//! - Runs before audit capture, so stamped values reach the persisted
//!   row (and the diff, for any schema that marks these columns audited).

use super::CommitContext;
use crate::changeset::{EntityState, TrackedEntity};
use crate::model::meta::{CREATED_AT, CREATED_BY, UPDATED_AT, UPDATED_BY};
use rusqlite::types::Value;

/// Stamps attribution metadata onto all pending changes.
pub fn stamp_commit_metadata(changes: &mut [TrackedEntity], ctx: &CommitContext) {
    let stamped_at = Value::Integer(ctx.now_epoch_ms);
    let stamped_by = match &ctx.actor {
        Some(actor) => Value::Text(actor.user_id.clone()),
        None => Value::Null,
    };

    for change in changes {
        match change.state {
            EntityState::Added => {
                set_current(change, CREATED_AT, stamped_at.clone());
                set_current(change, CREATED_BY, stamped_by.clone());
            }
            EntityState::Modified => {
                set_current(change, UPDATED_AT, stamped_at.clone());
                set_current(change, UPDATED_BY, stamped_by.clone());
            }
            EntityState::Deleted | EntityState::Unchanged | EntityState::Detached => {}
        }
    }
}

fn set_current(change: &mut TrackedEntity, column: &str, value: Value) {
    // Entities whose schema lacks the column are left alone.
    if let Some(property) = change
        .properties
        .iter_mut()
        .find(|property| property.name == column)
    {
        property.current = value;
        property.is_modified = property.original != property.current;
    }
}
