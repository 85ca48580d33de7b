#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Checkbox tree synchronizer for classified element identifiers.
//!
//! # Purpose
//!
//! Mirrors a set of identifiers into a four-level checkbox tree that drives
//! mass-selection UI: branches aggregate leaf counts, checking a branch
//! checks everything below it, and the set of checked identifiers can be read
//! back at any time.
//!
//! # Mental Model
//!
//! Nodes live in a slab arena and refer to each other by generational
//! [`NodeId`] handles, parents included, so upward propagation is a walk over
//! handles rather than over owned back-references.
//!
//! 1. **Reconcile:** [`CheckTree::reconcile`] diffs the desired identifiers
//!    against the current leaves, builds leaves for additions, prunes removed
//!    leaves and emptied branches, expands what it touched, and recounts.
//! 2. **Check:** [`CheckTree::toggle_check`] sets a leaf or a whole subtree,
//!    recomputes each ancestor as "all children checked", then recounts the
//!    affected root branch.
//! 3. **Read back:** [`CheckTree::checked_identifiers`] snapshots the leaf
//!    index under a bounded lock wait and validates it against the counters.
//!
//! # Invariants
//!
//! - Must keep each branch's counters equal to the sums over its children.
//!   - Enforced in: [`state::TreeState::recount`].
//!   - Tested by: [`invariants::test_counter_sum`]
//!   - Failure symptom: `[ c/t ]` labels and the summary drift from reality.
//!
//! - Must force a toggled branch's subtree to one state.
//!   - Enforced in: [`state::TreeState::set_subtree`], [`state::TreeState::propagate_up`].
//!   - Tested by: [`invariants::test_branch_check_is_uniform`]
//!   - Failure symptom: a checked branch hides unchecked leaves.
//!
//! - Must keep surviving leaves' checked state across reconciliation.
//!   - Enforced in: [`state::TreeState::reconcile`] (diff, not rebuild).
//!   - Tested by: [`invariants::test_reconcile_preserves_checked`]
//!   - Failure symptom: refreshing the element set clears the user's picks.
//!
//! - Must prune branches that lose their last leaf.
//!   - Enforced in: [`state::TreeState::detach_leaf`].
//!   - Tested by: [`invariants::test_empty_branches_are_pruned`]
//!   - Failure symptom: empty `[ 0/0 ]` categories.
//!
//! - Must reject a stale external selection without mutating.
//!   - Enforced in: [`state::TreeState::sync_selection`].
//!   - Tested by: [`invariants::test_stale_selection_is_rejected`]
//!   - Failure symptom: half-applied selections mid-reconciliation.
//!
//! # Concurrency
//!
//! - One [`parking_lot::Mutex`] guards structure, flags and counters.
//! - [`CheckTree::checked_identifiers`] blocks on that lock and retries a
//!   torn snapshot up to [`TreeOptions::snapshot_attempts`] times.
//! - [`CheckTree::reconcile`] resolves descriptors before taking the lock and
//!   diffs again once it holds it.
//! - Callers must not run two reconciliations concurrently; the last to take
//!   the lock wins.

mod arena;
mod error;
mod invariants;
mod node;
mod options;
mod outline;
mod state;
mod summary;
mod tree;

#[cfg(test)]
mod test_fixtures;

pub use arena::NodeId;
pub use error::TreeError;
pub use node::{BranchNode, Children, LeafNode, Node};
pub use options::TreeOptions;
pub use outline::{OutlineRow, RowKind};
pub use summary::{CheckSummary, ReconcileReport};
pub use tree::CheckTree;
