//! Post entity.
//!
//! # Responsibility
//! - Define the canonical blog post record and its validation rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another post.
//! - `slug` is unique across posts (enforced by the schema).

use super::meta::{self, EntityMeta};
use super::{is_valid_slug, ModelValidationError};
use crate::changeset::schema::{ColumnDef, EntitySchema, Record};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for posts.
pub type PostId = Uuid;

pub const POST_SCHEMA: EntitySchema = EntitySchema {
    table: "posts",
    columns: &[
        ColumnDef::key("id"),
        ColumnDef::audited("title"),
        ColumnDef::audited("slug"),
        ColumnDef::audited("summary"),
        ColumnDef::audited("content"),
        ColumnDef::exempt(meta::CREATED_AT),
        ColumnDef::exempt(meta::CREATED_BY),
        ColumnDef::exempt(meta::UPDATED_AT),
        ColumnDef::exempt(meta::UPDATED_BY),
    ],
};

/// Canonical blog post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Stable global ID used for linking and audit key extraction.
    pub id: PostId,
    pub title: String,
    /// URL-facing unique identifier, lowercase hyphenated.
    pub slug: String,
    pub summary: Option<String>,
    /// Markdown body.
    pub content: String,
    /// Attribution metadata stamped by the save pipeline.
    pub meta: EntityMeta,
}

impl Post {
    /// Creates a new post with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, slug, content)
    }

    /// Creates a new post with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: PostId,
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            summary: None,
            content: content.into(),
            meta: EntityMeta::default(),
        }
    }
}

impl Record for Post {
    fn schema() -> &'static EntitySchema {
        &POST_SCHEMA
    }

    fn to_row(&self) -> Vec<Value> {
        let mut row = vec![
            Value::from(self.id.to_string()),
            Value::from(self.title.clone()),
            Value::from(self.slug.clone()),
            Value::from(self.summary.clone()),
            Value::from(self.content.clone()),
        ];
        row.extend(self.meta.row_values());
        row
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: "posts",
                field: "title",
            });
        }
        if !is_valid_slug(&self.slug) {
            return Err(ModelValidationError::InvalidSlug {
                entity: "posts",
                value: self.slug.clone(),
            });
        }
        Ok(())
    }
}
