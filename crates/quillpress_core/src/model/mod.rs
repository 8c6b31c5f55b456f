//! Blog domain model.
//!
//! # Responsibility
//! - Define the canonical entity records persisted by core.
//! - Provide shared attribution metadata and domain validation.
//!
//! # Invariants
//! - Every entity is identified by stable UUID keys.
//! - Slugs are lowercase, digit/hyphen separated, and unique per table.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod meta;
pub mod post;
pub mod post_category;

pub use category::{Category, CategoryId};
pub use meta::EntityMeta;
pub use post::{Post, PostId};
pub use post_category::PostCategory;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Domain validation error shared by all entity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    /// A slug does not match the lowercase-hyphenated format.
    InvalidSlug {
        entity: &'static str,
        value: String,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
            Self::InvalidSlug { entity, value } => {
                write!(f, "invalid slug `{value}` for {entity}")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Returns whether `value` is a well-formed slug.
pub fn is_valid_slug(value: &str) -> bool {
    SLUG_RE.is_match(value)
}
