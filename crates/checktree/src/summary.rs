use std::fmt;

use strata_primitives::{Identifier, ResolveError};

/// Checked and total leaf counts across the whole tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
	pub checked: usize,
	pub total: usize,
}

impl fmt::Display for CheckSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Total Selected Items: {} / {}", self.checked, self.total)
	}
}

/// Outcome of [`crate::CheckTree::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport<I: Identifier> {
	/// Leaves created.
	pub added: usize,
	/// Leaves removed.
	pub removed: usize,
	/// Desired identifiers the host could not resolve; they get no leaf.
	pub unresolved: Vec<(I, ResolveError)>,
}

impl<I: Identifier> Default for ReconcileReport<I> {
	fn default() -> Self {
		Self {
			added: 0,
			removed: 0,
			unresolved: Vec::new(),
		}
	}
}

impl<I: Identifier> ReconcileReport<I> {
	/// Returns true if the reconciliation changed the leaf set.
	pub fn changed(&self) -> bool {
		self.added > 0 || self.removed > 0
	}
}
