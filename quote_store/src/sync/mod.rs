//! Reconciliation against the remote source.
//!
//! - `reconcile` — the whole-collection comparison and the sync state machine.
//! - `scheduler` — a stoppable background worker that runs sync passes on a
//!   fixed period and on demand.

pub mod reconcile;
pub mod scheduler;
