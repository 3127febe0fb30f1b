//! Local working copy of the Kanban board.
//!
//! Mutations apply to the in-memory state first for responsiveness, then
//! a confirming request settles each entry as synced, reverted, or kept
//! as a flagged local-only copy. The snapshot persists between runs as a
//! JSON file.

pub mod advisory;
pub mod reconcile;
pub mod state;

pub use reconcile::{Outcome, Reconciler};
pub use state::{BoardEntry, BoardState, SyncState};
