//! Public, lock-guarded checkbox tree.

use std::thread;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use strata_primitives::{DescriptorSource, Identifier};
use tracing::{debug, error, trace};

use crate::arena::NodeId;
use crate::error::TreeError;
use crate::node::Node;
use crate::options::TreeOptions;
use crate::outline::OutlineRow;
use crate::state::{TreeState, resolve_all};
use crate::summary::{CheckSummary, ReconcileReport};

/// Checkbox tree mirroring a set of classified identifiers.
///
/// Branches follow the four classification levels; each leaf is one
/// identifier. All state sits behind one lock, so readers see either the
/// state before an operation or after it.
pub struct CheckTree<I: Identifier> {
	options: TreeOptions,
	pub(crate) state: Mutex<TreeState<I>>,
}

impl<I: Identifier> Default for CheckTree<I> {
	fn default() -> Self {
		Self::new(TreeOptions::default())
	}
}

impl<I: Identifier> CheckTree<I> {
	pub fn new(options: TreeOptions) -> Self {
		Self {
			options,
			state: Mutex::new(TreeState::default()),
		}
	}

	pub fn options(&self) -> &TreeOptions {
		&self.options
	}

	/// Brings the leaf set in line with `desired`.
	///
	/// Leaves that survive keep their checked state. New leaves start
	/// unchecked; identifiers `source` cannot resolve get no leaf and are
	/// listed in the report. Descriptors are looked up before the tree lock
	/// is taken, so readers are not held up by a slow source.
	///
	/// # Errors
	///
	/// [`TreeError::Inconsistent`] if a leaf to remove has a broken parent
	/// chain or a new leaf's path runs through a broken branch. Both are
	/// detected before the first mutation, so the tree is left as it was.
	pub fn reconcile(
		&self,
		desired: impl IntoIterator<Item = I>,
		source: &impl DescriptorSource<I>,
	) -> Result<ReconcileReport<I>, TreeError> {
		let desired: FxHashSet<I> = desired.into_iter().collect();
		let pending = self.state.lock().missing_leaves(&desired);
		let resolved = resolve_all(pending, source);

		let mut state = self.state.lock();
		let report = state.reconcile(&desired, resolved, source, &self.options).inspect_err(|err| {
			error!(error = %err, "checkbox tree out of sync; reconciliation aborted");
		})?;
		debug!(
			added = report.added,
			removed = report.removed,
			unresolved = report.unresolved.len(),
			summary = %state.summary,
			"reconciled checkbox tree"
		);
		Ok(report)
	}

	/// Checks or unchecks a leaf, or every leaf below a branch, and updates
	/// ancestors and counters.
	pub fn toggle_check(&self, node: NodeId, checked: bool) -> Result<(), TreeError> {
		let mut state = self.state.lock();
		state.toggle_check(node, checked)?;
		trace!(%node, checked, summary = %state.summary, "toggled check");
		Ok(())
	}

	/// Expands the whole subtree if every direct child is collapsed,
	/// otherwise collapses every direct child. `node` itself is never
	/// collapsed.
	///
	/// Returns true if the subtree was expanded.
	pub fn toggle_collapse(&self, node: NodeId) -> Result<bool, TreeError> {
		self.state.lock().toggle_collapse(node)
	}

	/// Sets every leaf's checked state to its membership in `selected`.
	///
	/// Returns `Ok(false)` without touching anything if `selected` names an
	/// identifier that has no leaf.
	pub fn sync_from_external_selection(&self, selected: &FxHashSet<I>) -> Result<bool, TreeError> {
		let mut state = self.state.lock();
		let synced = state.sync_selection(selected)?;
		if synced {
			debug!(summary = %state.summary, "synced checkbox tree to external selection");
		} else {
			debug!(requested = selected.len(), "external selection is stale; not synced");
		}
		Ok(synced)
	}

	/// Identifiers of every checked leaf, sorted.
	///
	/// Waits for the tree lock, so a concurrent reconciliation only delays
	/// the read. A snapshot that disagrees with the published counters is
	/// retried after [`TreeOptions::snapshot_wait`].
	///
	/// # Errors
	///
	/// [`TreeError::SnapshotUnavailable`] once every attempt produced a torn
	/// snapshot.
	pub fn checked_identifiers(&self) -> Result<Vec<I>, TreeError> {
		let attempts = self.options.snapshot_attempts.max(1);
		for attempt in 1..=attempts {
			let state = self.state.lock();
			let (mut checked, visited) = state.checked_snapshot();
			let expected = state.summary;
			drop(state);

			if visited == expected.total && checked.len() == expected.checked {
				checked.sort_unstable();
				return Ok(checked);
			}
			trace!(
				attempt,
				visited,
				checked = checked.len(),
				expected = %expected,
				"checked snapshot disagrees with counters; retrying"
			);
			if attempt < attempts {
				thread::sleep(self.options.snapshot_wait);
			}
		}
		error!(attempts, "no consistent checked snapshot");
		Err(TreeError::SnapshotUnavailable { attempts })
	}

	/// Global checked/total counters.
	pub fn summary(&self) -> CheckSummary {
		self.state.lock().summary
	}

	/// Leaf handle for `id`.
	pub fn leaf(&self, id: I) -> Option<NodeId> {
		self.state.lock().leaves.get(&id).copied()
	}

	/// Branch handle at a key path starting from a root key.
	pub fn branch_at<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
		self.state.lock().branch_at(path)
	}

	/// Root branch handles in key order.
	pub fn roots(&self) -> Vec<NodeId> {
		self.state.lock().roots.values().copied().collect()
	}

	/// Copy of the node behind `handle`.
	pub fn node(&self, handle: NodeId) -> Option<Node<I>> {
		self.state.lock().arena.get(handle).cloned()
	}

	/// Every identifier with a leaf, sorted.
	pub fn leaf_ids(&self) -> Vec<I> {
		let mut ids: Vec<I> = self.state.lock().leaves.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	pub fn len(&self) -> usize {
		self.state.lock().leaves.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Pre-order rows of the whole tree, roots and siblings in key order.
	pub fn outline(&self) -> Vec<OutlineRow<I>> {
		self.state.lock().outline()
	}

	/// Checks every tree invariant against the current state.
	pub fn verify(&self) -> Result<(), TreeError> {
		crate::invariants::check_state(&self.state.lock())
	}
}
