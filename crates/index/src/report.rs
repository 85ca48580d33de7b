use strata_primitives::{Identifier, ResolveError};

/// Outcome of a batch mutation.
///
/// Batches degrade per identifier: anything not applied is accounted for
/// here rather than failing the whole call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<I: Identifier> {
	/// Identifiers added or removed by this batch.
	pub applied: usize,
	/// Identifiers that needed no change (already tracked on append, not
	/// tracked on remove, or repeated within the batch).
	pub skipped: usize,
	/// Identifiers the host could not resolve, with the reason.
	pub unresolved: Vec<(I, ResolveError)>,
}

impl<I: Identifier> Default for BatchReport<I> {
	fn default() -> Self {
		Self {
			applied: 0,
			skipped: 0,
			unresolved: Vec::new(),
		}
	}
}

impl<I: Identifier> BatchReport<I> {
	/// Returns true if every requested identifier was applied.
	pub fn is_complete(&self) -> bool {
		self.skipped == 0 && self.unresolved.is_empty()
	}
}
