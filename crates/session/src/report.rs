use strata_checktree::{CheckSummary, ReconcileReport};
use strata_primitives::{FilterMode, Identifier};

/// Outcome of [`crate::FilterSession::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport<I: Identifier> {
	pub mode: FilterMode,
	/// Whether the active subset was recomputed.
	pub recomputed: bool,
	/// Size of the active subset the tree was reconciled against.
	pub subset_len: usize,
	pub reconcile: ReconcileReport<I>,
	pub summary: CheckSummary,
}
