//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Keep SQL details inside the core persistence boundary.
//! - Stage audit rows and business rows inside the caller's transaction.
//!
//! # Invariants
//! - Write helpers participate in an open transaction and never commit
//!   on their own.
//! - Repository APIs return semantic errors (`RowNotFound`) in addition
//!   to DB transport errors.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod audit_trail_repo;
pub mod post_repo;
pub mod row_writer;

pub use audit_trail_repo::SqliteAuditTrailRepository;
pub use post_repo::{PostRepository, SqlitePostRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// An UPDATE/DELETE matched no row for the staged key values.
    RowNotFound { table: &'static str },
    /// Persisted or staged state violates a storage contract.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::RowNotFound { table } => write!(f, "row not found in `{table}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::RowNotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
