//! Unit-of-work session and commit orchestration.
//!
//! # Responsibility
//! - Accumulate staged entity changes and commit them, together with
//!   their audit records, as one atomic SQLite transaction.
//! - Thread actor identity and clock explicitly through the pipeline.
//!
//! # Invariants
//! - Either the business rows and all their audit rows land together, or
//!   none do.
//! - Audit capture failures abort the whole save; there is no audit-only
//!   failure path.
//! - Commit order: stamp attribution metadata, build audit records,
//!   stage audit rows, apply business rows, commit.

use crate::audit::{build_audit_entries, Actor, AuditRecord};
use crate::changeset::schema::Record;
use crate::changeset::snapshot::{track_added, track_deleted, track_modified};
use crate::changeset::{ChangeSetError, TrackedEntity};
use crate::model::ModelValidationError;
use crate::repo::row_writer::apply_change;
use crate::repo::{RepoError, SqliteAuditTrailRepository};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

mod stamp;

pub use stamp::stamp_commit_metadata;

/// Whether commits without an authenticated actor produce audit records.
///
/// The default preserves the historical behavior: anonymous writes leave
/// no audit trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditPolicy {
    /// Skip audit capture when no actor is present.
    #[default]
    SkipAnonymous,
    /// Capture audit records with empty attribution.
    CaptureAnonymous,
}

/// Actor and clock inputs for one commit, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitContext {
    pub actor: Option<Actor>,
    /// Commit timestamp, epoch milliseconds.
    pub now_epoch_ms: i64,
}

impl CommitContext {
    pub fn authenticated(actor: Actor, now_epoch_ms: i64) -> Self {
        Self {
            actor: Some(actor),
            now_epoch_ms,
        }
    }

    pub fn anonymous(now_epoch_ms: i64) -> Self {
        Self {
            actor: None,
            now_epoch_ms,
        }
    }
}

/// Save pipeline error.
#[derive(Debug)]
pub enum SaveError {
    Validation(ModelValidationError),
    /// The staged change set violates the audit capture contract.
    ChangeSet(ChangeSetError),
    /// Row write or engine commit failure; the whole batch rolled back.
    Repo(RepoError),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ChangeSet(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ChangeSet(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for SaveError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ChangeSetError> for SaveError {
    fn from(value: ChangeSetError) -> Self {
        Self::ChangeSet(value)
    }
}

impl From<RepoError> for SaveError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SaveError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Unit of work over one SQLite connection.
///
/// Entities are staged through `stage_insert`/`stage_update`/
/// `stage_delete` and written by a single `save_changes` call.
pub struct Session<'conn> {
    conn: &'conn mut Connection,
    policy: AuditPolicy,
    pending: Vec<TrackedEntity>,
}

impl<'conn> Session<'conn> {
    /// Creates a session with the default audit policy.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self::with_policy(conn, AuditPolicy::default())
    }

    /// Creates a session with an explicit anonymous-write policy.
    pub fn with_policy(conn: &'conn mut Connection, policy: AuditPolicy) -> Self {
        Self {
            conn,
            policy,
            pending: Vec::new(),
        }
    }

    /// Number of staged, not yet committed changes.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Stages an entity insert.
    ///
    /// # Errors
    /// - Validation failures surface immediately, before anything is
    ///   staged.
    pub fn stage_insert<R: Record>(&mut self, entity: &R) -> Result<(), SaveError> {
        entity.validate()?;
        self.pending.push(track_added(entity));
        Ok(())
    }

    /// Stages an entity update from before/after snapshots.
    ///
    /// When the snapshots are identical the entity is recorded as
    /// unchanged and the commit will skip it.
    pub fn stage_update<R: Record>(&mut self, before: &R, after: &R) -> Result<(), SaveError> {
        after.validate()?;
        self.pending.push(track_modified(before, after));
        Ok(())
    }

    /// Stages an entity delete.
    pub fn stage_delete<R: Record>(&mut self, entity: &R) {
        self.pending.push(track_deleted(entity));
    }

    /// Commits all staged changes plus their audit records atomically.
    ///
    /// Returns the total number of rows affected (business and audit).
    /// On failure the transaction is rolled back in full and the staged
    /// changes are kept for inspection.
    pub fn save_changes(&mut self, ctx: &CommitContext) -> Result<usize, SaveError> {
        let started_at = Instant::now();
        let staged = self.pending.len();
        info!(
            "event=save_changes module=session status=start staged={staged} actor={}",
            actor_label(ctx)
        );

        match self.commit_pending(ctx) {
            Ok((rows_affected, audit_rows)) => {
                info!(
                    "event=save_changes module=session status=ok staged={staged} \
                     rows_affected={rows_affected} audit_rows={audit_rows} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.pending.clear();
                Ok(rows_affected)
            }
            Err(err) => {
                error!(
                    "event=save_changes module=session status=error staged={staged} \
                     duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn commit_pending(&mut self, ctx: &CommitContext) -> Result<(usize, usize), SaveError> {
        if self.pending.is_empty() {
            return Ok((0, 0));
        }

        stamp_commit_metadata(&mut self.pending, ctx);

        let records = self.capture_audit(ctx)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let audit_rows = SqliteAuditTrailRepository::new(&tx).append(&records)?;
        let mut rows_affected = audit_rows;
        for change in &self.pending {
            rows_affected += apply_change(&tx, change)?;
        }
        tx.commit()?;

        Ok((rows_affected, audit_rows))
    }

    fn capture_audit(&self, ctx: &CommitContext) -> Result<Vec<AuditRecord>, SaveError> {
        if ctx.actor.is_none() && self.policy == AuditPolicy::SkipAnonymous {
            return Ok(Vec::new());
        }
        Ok(build_audit_entries(
            &self.pending,
            ctx.actor.as_ref(),
            ctx.now_epoch_ms,
        )?)
    }
}

fn actor_label(ctx: &CommitContext) -> &'static str {
    if ctx.actor.is_some() {
        "present"
    } else {
        "anonymous"
    }
}
