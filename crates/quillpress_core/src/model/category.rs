//! Category entity.

use super::meta::{self, EntityMeta};
use super::{is_valid_slug, ModelValidationError};
use crate::changeset::schema::{ColumnDef, EntitySchema, Record};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for categories.
pub type CategoryId = Uuid;

pub const CATEGORY_SCHEMA: EntitySchema = EntitySchema {
    table: "categories",
    columns: &[
        ColumnDef::key("id"),
        ColumnDef::audited("name"),
        ColumnDef::audited("slug"),
        ColumnDef::exempt(meta::CREATED_AT),
        ColumnDef::exempt(meta::CREATED_BY),
        ColumnDef::exempt(meta::UPDATED_AT),
        ColumnDef::exempt(meta::UPDATED_BY),
    ],
};

/// Taxonomy node grouping posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-facing unique identifier, lowercase hyphenated.
    pub slug: String,
    /// Attribution metadata stamped by the save pipeline.
    pub meta: EntityMeta,
}

impl Category {
    /// Creates a new category with a generated stable ID.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            meta: EntityMeta::default(),
        }
    }
}

impl Record for Category {
    fn schema() -> &'static EntitySchema {
        &CATEGORY_SCHEMA
    }

    fn to_row(&self) -> Vec<Value> {
        let mut row = vec![
            Value::from(self.id.to_string()),
            Value::from(self.name.clone()),
            Value::from(self.slug.clone()),
        ];
        row.extend(self.meta.row_values());
        row
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: "categories",
                field: "name",
            });
        }
        if !is_valid_slug(&self.slug) {
            return Err(ModelValidationError::InvalidSlug {
                entity: "categories",
                value: self.slug.clone(),
            });
        }
        Ok(())
    }
}
