#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Multi-level classification index over tracked element identifiers.
//!
//! # Purpose
//!
//! Files every tracked identifier under a fixed four-level hierarchy
//! (category type, category, family, element type) so that callers can
//! enumerate the identifiers under any breadcrumb, and maintains an *active
//! subset* that reflects the current [`FilterMode`](strata_primitives::FilterMode).
//!
//! # Mental Model
//!
//! 1. **Ingest:** [`ClassificationIndex::append_batch`] asks a
//!    [`DescriptorSource`](strata_primitives::DescriptorSource) for each new
//!    identifier's keys, groups the batch level by level, and extends every
//!    group it touches in one pass.
//! 2. **Retire:** [`ClassificationIndex::remove_batch`] walks the same paths in
//!    reverse and prunes groups that become empty. The walk is validated first,
//!    so a batch either applies fully or not at all.
//! 3. **Filter:** [`ClassificationIndex::set_active_mode`] recomputes the active
//!    subset from the tree, the host selection, or the owner-context index, and
//!    publishes it as a frozen [`Arc`](std::sync::Arc).
//! 4. **Query:** [`ClassificationIndex::get_by_path`] descends by key and falls
//!    back to matching an element's display form at the current depth.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`ClassificationIndex`] | Lock-guarded index and its operations. |
//! | [`GroupNode`] | One group of the tree; owns its children. |
//! | [`BatchReport`] | Per-identifier outcome of a batch mutation. |
//! | [`IndexOptions`] | Tunables, currently the hidden-union policy. |
//!
//! # Invariants
//!
//! - Must keep every group's members equal to the union of its children's.
//!   - Enforced in: [`group::GroupNode::insert_grouped`], [`group::GroupNode::remove_grouped`].
//!   - Tested by: [`invariants::test_membership_union`]
//!   - Failure symptom: a breadcrumb lists elements its children do not.
//!
//! - Must prune groups that lose their last member.
//!   - Enforced in: [`group::GroupNode::remove_grouped`].
//!   - Tested by: [`invariants::test_remove_restores_empty_root`]
//!   - Failure symptom: empty categories linger in navigation.
//!
//! - Must leave the tree untouched when a removal cannot be applied.
//!   - Enforced in: [`group::GroupNode::check_paths`].
//!   - Tested by: [`invariants::test_failed_removal_is_atomic`]
//!   - Failure symptom: half-removed batches and drifting counts.
//!
//! - Must keep the owner-context index in step with descriptors.
//!   - Enforced in: [`classification::IndexState`] append and removal.
//!   - Tested by: [`invariants::test_owner_index_tracks_removals`]
//!   - Failure symptom: View mode shows elements that are gone.
//!
//! - Must compute the same subset for the same mode and sources.
//!   - Enforced in: [`subset::compute`].
//!   - Tested by: [`invariants::test_subset_is_deterministic`]
//!   - Failure symptom: toggling modes changes what is visible.
//!
//! # Concurrency
//!
//! - **Mutations and queries:** serialized by one [`parking_lot::Mutex`]; each
//!   public operation holds it for its whole duration.
//! - **Active subset:** readers clone an `Arc` and never observe a partially
//!   built subset.

mod classification;
mod error;
mod group;
mod invariants;
mod report;
mod subset;

#[cfg(test)]
mod test_fixtures;

pub use classification::ClassificationIndex;
pub use error::IndexError;
pub use group::{GroupNode, ROOT_NAME};
pub use report::BatchReport;
pub use subset::{HiddenUnionPolicy, IndexOptions};
