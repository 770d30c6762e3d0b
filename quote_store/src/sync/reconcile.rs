//! Whole-collection reconciliation with remote-wins semantics.
//!
//! States: `Idle -> Syncing -> {up to date | ConflictPending} -> Idle`.
//!
//! A pass compares the entire ordered local collection with the fetched one.
//! Any difference, including a pure reordering, is a conflict: the caller
//! backs up local data and applies the remote collection, then the user may
//! revert with keep-local or confirm with use-server. There is no per-record
//! merge.
//!
//! Passes are not serialized here. Each `begin` is matched by exactly one
//! `finish_*` call; overlapping passes simply keep the state at `Syncing`
//! until the last one finishes, and the later-finishing pass decides the data.

use strum_macros::{Display, EnumString};

use crate::model::quote::Quote;

/// Observable phase of the sync state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SyncState {
    /// No pass running and no decision pending.
    Idle,
    /// At least one fetch is in flight.
    Syncing,
    /// Remote data was applied and the user has not chosen a side yet.
    ConflictPending,
}

/// Result of one completed sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote and local collections were identical.
    UpToDate,
    /// Remote data replaced the local collection.
    ConflictApplied {
        /// Number of local quotes that were backed up and replaced.
        replaced: usize,
        /// Number of remote quotes now active.
        applied: usize,
    },
}

/// What the store must do with a fetched collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to change.
    UpToDate,
    /// Back up local data and replace it with the contained collection.
    Overwrite(Vec<Quote>),
}

/// Order-sensitive structural equality over whole collections.
pub fn collections_equal(local: &[Quote], remote: &[Quote]) -> bool {
    local.len() == remote.len() && local.iter().zip(remote).all(|(a, b)| a == b)
}

/// Sync state machine plus the in-memory snapshot of the last fetch.
#[derive(Debug, Default)]
pub struct Reconciler {
    in_flight: usize,
    conflict_pending: bool,
    snapshot: Option<Vec<Quote>>,
}

impl Reconciler {
    /// Creates an idle reconciler with no snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn state(&self) -> SyncState {
        if self.in_flight > 0 {
            SyncState::Syncing
        } else if self.conflict_pending {
            SyncState::ConflictPending
        } else {
            SyncState::Idle
        }
    }

    /// True while the user still has to choose keep-local or use-server.
    pub fn has_pending_conflict(&self) -> bool {
        self.conflict_pending
    }

    /// Last fetched remote collection, if any.
    pub fn snapshot(&self) -> Option<&[Quote]> {
        self.snapshot.as_deref()
    }

    /// Marks a pass as started.
    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    /// Completes a pass with a fetched collection and decides what to do.
    ///
    /// The snapshot is replaced unconditionally, so a newer pass supersedes
    /// any undecided earlier one.
    pub fn finish_fetched(&mut self, local: &[Quote], remote: Vec<Quote>) -> Decision {
        self.in_flight = self.in_flight.saturating_sub(1);
        let decision = if collections_equal(local, &remote) {
            self.conflict_pending = false;
            Decision::UpToDate
        } else {
            self.conflict_pending = true;
            Decision::Overwrite(remote.clone())
        };
        self.snapshot = Some(remote);
        decision
    }

    /// Completes a pass whose fetch failed. A pending decision survives.
    pub fn finish_failed(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Closes a pending decision after keep-local or use-server.
    pub fn resolve(&mut self) {
        self.conflict_pending = false;
    }
}
