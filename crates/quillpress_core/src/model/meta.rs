//! Shared attribution metadata block.
//!
//! # Responsibility
//! - Carry created/updated timestamps and actor ids on every entity.
//!
//! # Invariants
//! - Fields start as `None` and are stamped by the save pipeline, never
//!   by entity constructors.
//! - Timestamps are Unix epoch milliseconds.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

pub const CREATED_AT: &str = "created_at";
pub const CREATED_BY: &str = "created_by";
pub const UPDATED_AT: &str = "updated_at";
pub const UPDATED_BY: &str = "updated_by";

/// Attribution metadata stamped onto entities at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Epoch milliseconds of the creating commit.
    pub created_at: Option<i64>,
    /// Actor id of the creating commit.
    pub created_by: Option<String>,
    /// Epoch milliseconds of the latest updating commit.
    pub updated_at: Option<i64>,
    /// Actor id of the latest updating commit.
    pub updated_by: Option<String>,
}

impl EntityMeta {
    /// Snapshot values in `created_at, created_by, updated_at, updated_by`
    /// column order.
    pub fn row_values(&self) -> [Value; 4] {
        [
            Value::from(self.created_at),
            Value::from(self.created_by.clone()),
            Value::from(self.updated_at),
            Value::from(self.updated_by.clone()),
        ]
    }
}
