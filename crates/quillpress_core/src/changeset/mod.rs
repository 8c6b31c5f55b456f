//! Engine-agnostic change-set representation.
//!
//! # Responsibility
//! - Define the value structures describing one pending commit: which
//!   entities changed, how, and per-column original/current values.
//! - Keep audit capture decoupled from any specific persistence engine's
//!   live tracking graph.
//!
//! # Invariants
//! - A `TrackedEntity` is a plain value; building one never touches storage.
//! - Column order inside `TrackedEntity::properties` follows the entity's
//!   schema descriptor, so downstream output is deterministic.

pub mod schema;
pub mod snapshot;
mod tracked;

pub use tracked::{ChangeSetError, EntityState, TrackedEntity, TrackedProperty};
