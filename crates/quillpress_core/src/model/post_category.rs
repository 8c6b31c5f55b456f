//! Post/category link entity.
//!
//! # Invariants
//! - Identity is the composite `(post_id, category_id)` pair; the link
//!   carries no business columns of its own.

use super::meta::{self, EntityMeta};
use super::{CategoryId, PostId};
use crate::changeset::schema::{ColumnDef, EntitySchema, Record};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

pub const POST_CATEGORY_SCHEMA: EntitySchema = EntitySchema {
    table: "post_categories",
    columns: &[
        ColumnDef::key("post_id"),
        ColumnDef::key("category_id"),
        ColumnDef::exempt(meta::CREATED_AT),
        ColumnDef::exempt(meta::CREATED_BY),
        ColumnDef::exempt(meta::UPDATED_AT),
        ColumnDef::exempt(meta::UPDATED_BY),
    ],
};

/// Membership of one post in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCategory {
    pub post_id: PostId,
    pub category_id: CategoryId,
    /// Attribution metadata stamped by the save pipeline.
    pub meta: EntityMeta,
}

impl PostCategory {
    pub fn new(post_id: PostId, category_id: CategoryId) -> Self {
        Self {
            post_id,
            category_id,
            meta: EntityMeta::default(),
        }
    }
}

impl Record for PostCategory {
    fn schema() -> &'static EntitySchema {
        &POST_CATEGORY_SCHEMA
    }

    fn to_row(&self) -> Vec<Value> {
        let mut row = vec![
            Value::from(self.post_id.to_string()),
            Value::from(self.category_id.to_string()),
        ];
        row.extend(self.meta.row_values());
        row
    }
}
