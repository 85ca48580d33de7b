use rustc_hash::{FxHashMap, FxHashSet};

use crate::ids::Identifier;

/// Identifiers hidden in a context but still counted as part of it.
///
/// Contexts with no hidden identifiers have no entry.
#[derive(Debug, Clone)]
pub struct HiddenTracker<I: Identifier> {
	by_context: FxHashMap<I, FxHashSet<I>>,
}

impl<I: Identifier> Default for HiddenTracker<I> {
	fn default() -> Self {
		Self {
			by_context: FxHashMap::default(),
		}
	}
}

impl<I: Identifier> HiddenTracker<I> {
	/// Records `ids` as hidden in `context`. Returns how many were newly added.
	pub fn mark_hidden(&mut self, context: I, ids: impl IntoIterator<Item = I>) -> usize {
		let set = self.by_context.entry(context).or_default();
		let added = ids.into_iter().filter(|id| set.insert(*id)).count();
		if set.is_empty() {
			self.by_context.remove(&context);
		}
		added
	}

	/// Forgets `ids` as hidden in `context`. Returns how many were removed.
	pub fn unmark_hidden(&mut self, context: I, ids: impl IntoIterator<Item = I>) -> usize {
		let Some(set) = self.by_context.get_mut(&context) else {
			return 0;
		};
		let removed = ids.into_iter().filter(|id| set.remove(id)).count();
		if set.is_empty() {
			self.by_context.remove(&context);
		}
		removed
	}

	/// Copy of the identifiers hidden in `context`.
	pub fn hidden_in(&self, context: I) -> FxHashSet<I> {
		self.by_context.get(&context).cloned().unwrap_or_default()
	}

	/// Returns true if `id` is hidden in `context`.
	pub fn is_hidden(&self, context: I, id: I) -> bool {
		self.by_context.get(&context).is_some_and(|set| set.contains(&id))
	}

	/// Number of contexts with at least one hidden identifier.
	pub fn context_count(&self) -> usize {
		self.by_context.len()
	}

	pub fn clear(&mut self) {
		self.by_context.clear();
	}
}
