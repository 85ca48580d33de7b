//! Lock-guarded classification index.
//!
//! # Role
//!
//! Owns the grouping tree, the identifier lookup and the owner-context index,
//! and answers subset and path queries. Every public operation takes the one
//! state lock for its whole duration.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use strata_primitives::{DescriptorSource, FilterMode, HostContext, Identifier, Level, NodeDescriptor};
use tracing::{debug, error, trace};

use crate::error::IndexError;
use crate::group::GroupNode;
use crate::report::BatchReport;
use crate::subset::{self, IndexOptions, SubsetSources};

pub(crate) struct IndexState<I: Identifier> {
	pub(crate) root: GroupNode<I>,
	pub(crate) descriptors: FxHashMap<I, NodeDescriptor<I>>,
	pub(crate) by_owner: FxHashMap<I, FxHashSet<I>>,
	pub(crate) mode: Option<FilterMode>,
	pub(crate) active: Arc<FxHashSet<I>>,
}

impl<I: Identifier> IndexState<I> {
	fn new() -> Self {
		Self {
			root: GroupNode::root(),
			descriptors: FxHashMap::default(),
			by_owner: FxHashMap::default(),
			mode: None,
			active: Arc::new(FxHashSet::default()),
		}
	}

	fn clear(&mut self) {
		self.root.clear();
		self.descriptors.clear();
		self.by_owner.clear();
	}

	fn append(&mut self, ids: impl IntoIterator<Item = I>, source: &impl DescriptorSource<I>) -> BatchReport<I> {
		let mut report = BatchReport::default();
		let mut fresh: Vec<NodeDescriptor<I>> = Vec::new();
		let mut queued = FxHashSet::default();

		for id in ids {
			if self.descriptors.contains_key(&id) || !queued.insert(id) {
				report.skipped += 1;
				continue;
			}
			match source.resolve_descriptor(id) {
				Ok(desc) if desc.id() == id => fresh.push(desc),
				Ok(desc) => {
					trace!(%id, returned = %desc.id(), "descriptor source answered for another element");
					report.unresolved.push((id, strata_primitives::ResolveError::not_found(id)));
				}
				Err(err) => {
					trace!(%id, error = %err, "skipping unresolvable element");
					report.unresolved.push((id, err));
				}
			}
		}

		{
			let batch: Vec<&NodeDescriptor<I>> = fresh.iter().collect();
			self.root.insert_grouped(&batch, Some(Level::CategoryType));
		}

		report.applied = fresh.len();
		for desc in fresh {
			if let Some(owner) = desc.owner_context() {
				self.by_owner.entry(owner).or_default().insert(desc.id());
			}
			self.descriptors.insert(desc.id(), desc);
		}
		report
	}

	fn remove(&mut self, ids: impl IntoIterator<Item = I>) -> Result<BatchReport<I>, IndexError> {
		let mut report = BatchReport::default();
		let mut doomed: Vec<I> = Vec::new();
		let mut queued = FxHashSet::default();
		for id in ids {
			if self.descriptors.contains_key(&id) && queued.insert(id) {
				doomed.push(id);
			} else {
				report.skipped += 1;
			}
		}

		let batch: Vec<&NodeDescriptor<I>> = doomed.iter().filter_map(|id| self.descriptors.get(id)).collect();
		if let Err(err) = self.root.check_paths(&batch) {
			error!(error = %err, "classification tree out of sync with lookup; batch removal aborted");
			return Err(err);
		}
		self.root.remove_grouped(&batch, Some(Level::CategoryType));

		for id in &doomed {
			let Some(desc) = self.descriptors.remove(id) else {
				continue;
			};
			if let Some(owner) = desc.owner_context()
				&& let Some(set) = self.by_owner.get_mut(&owner)
			{
				set.remove(id);
				if set.is_empty() {
					self.by_owner.remove(&owner);
				}
			}
		}
		report.applied = doomed.len();
		Ok(report)
	}
}

/// Multi-level grouping index over tracked identifiers.
pub struct ClassificationIndex<I: Identifier> {
	options: IndexOptions,
	pub(crate) state: Mutex<IndexState<I>>,
}

impl<I: Identifier> Default for ClassificationIndex<I> {
	fn default() -> Self {
		Self::new(IndexOptions::default())
	}
}

impl<I: Identifier> ClassificationIndex<I> {
	pub fn new(options: IndexOptions) -> Self {
		Self {
			options,
			state: Mutex::new(IndexState::new()),
		}
	}

	pub fn options(&self) -> IndexOptions {
		self.options
	}

	/// Tracks every identifier in `ids` that is not tracked yet.
	///
	/// Identifiers `source` cannot resolve are skipped and listed in the report.
	pub fn append_batch(&self, ids: impl IntoIterator<Item = I>, source: &impl DescriptorSource<I>) -> BatchReport<I> {
		let report = self.state.lock().append(ids, source);
		debug!(
			applied = report.applied,
			skipped = report.skipped,
			unresolved = report.unresolved.len(),
			"appended batch"
		);
		report
	}

	/// Stops tracking every identifier in `ids`; untracked ones are skipped.
	///
	/// # Errors
	///
	/// [`IndexError::Inconsistent`] if a tracked identifier's path has no live
	/// branch. Nothing is removed in that case.
	pub fn remove_batch(&self, ids: impl IntoIterator<Item = I>) -> Result<BatchReport<I>, IndexError> {
		let report = self.state.lock().remove(ids)?;
		debug!(applied = report.applied, skipped = report.skipped, "removed batch");
		Ok(report)
	}

	/// Drops every tracked identifier. The mode and active subset are kept.
	pub fn clear_all(&self) {
		self.state.lock().clear();
		debug!("cleared index");
	}

	/// Clears and re-appends `ids` under one critical section.
	pub fn replace_all(&self, ids: impl IntoIterator<Item = I>, source: &impl DescriptorSource<I>) -> BatchReport<I> {
		let mut state = self.state.lock();
		state.clear();
		let report = state.append(ids, source);
		debug!(applied = report.applied, unresolved = report.unresolved.len(), "replaced index contents");
		report
	}

	/// Recomputes the active subset for `mode`.
	///
	/// Returns `false` without recomputing when `mode` is already active, not
	/// forced, and not [`FilterMode::View`]; View is always recomputed since the
	/// host's active view can change between calls.
	pub fn set_active_mode(&self, mode: FilterMode, force: bool, host: &impl HostContext<I>) -> bool {
		let mut state = self.state.lock();
		if state.mode == Some(mode) && !force && !mode.always_refresh() {
			return false;
		}

		let subset = subset::compute(
			mode,
			force,
			SubsetSources {
				all: state.root.members(),
				by_owner: &state.by_owner,
			},
			host,
			self.options.hidden_union,
		);
		debug!(%mode, force, size = subset.len(), "recomputed active subset");
		state.active = Arc::new(subset);
		state.mode = Some(mode);
		true
	}

	/// Mode the active subset was last computed for.
	pub fn current_mode(&self) -> Option<FilterMode> {
		self.state.lock().mode
	}

	/// Frozen copy of the active subset as of the last recomputation.
	pub fn active_subset(&self) -> Arc<FxHashSet<I>> {
		Arc::clone(&self.state.lock().active)
	}

	/// Identifiers under a classification breadcrumb.
	///
	/// Each token selects a child group. A token that matches no child is
	/// tried as the display form of a member of the current group, yielding
	/// that single identifier. An empty path yields every tracked identifier.
	///
	/// # Errors
	///
	/// [`IndexError::NotFound`] if a token resolves neither way.
	pub fn get_by_path<S: AsRef<str>>(&self, path: &[S]) -> Result<FxHashSet<I>, IndexError> {
		let state = self.state.lock();
		let mut node = &state.root;
		for (depth, token) in path.iter().enumerate() {
			let token = token.as_ref();
			if let Some(child) = node.child(token) {
				node = child;
				continue;
			}
			if let Some(id) = node.members().iter().find(|id| id.to_string() == token) {
				return Ok(FxHashSet::from_iter([*id]));
			}
			return Err(IndexError::NotFound {
				token: token.to_string(),
				depth,
			});
		}
		Ok(node.members().clone())
	}

	/// Child keys of the group at `path`, in lexicographic order.
	pub fn children_at<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<String>, IndexError> {
		let state = self.state.lock();
		let mut node = &state.root;
		for (depth, token) in path.iter().enumerate() {
			node = node.child(token.as_ref()).ok_or_else(|| IndexError::NotFound {
				token: token.as_ref().to_string(),
				depth,
			})?;
		}
		Ok(node.children().keys().cloned().collect())
	}

	/// Buckets tracked identifiers from `ids` by their key at `level`.
	/// Untracked identifiers are left out.
	pub fn group_by(&self, level: Level, ids: impl IntoIterator<Item = I>) -> BTreeMap<String, Vec<I>> {
		let state = self.state.lock();
		let mut grouping: BTreeMap<String, Vec<I>> = BTreeMap::new();
		for id in ids {
			if let Some(desc) = state.descriptors.get(&id) {
				grouping.entry(desc.key(level).to_string()).or_default().push(id);
			}
		}
		grouping
	}

	/// Tracked identifiers owned by `context`.
	pub fn identifiers_in_context(&self, context: I) -> FxHashSet<I> {
		self.state.lock().by_owner.get(&context).cloned().unwrap_or_default()
	}

	pub fn descriptor(&self, id: I) -> Option<NodeDescriptor<I>> {
		self.state.lock().descriptors.get(&id).cloned()
	}

	pub fn contains(&self, id: I) -> bool {
		self.state.lock().descriptors.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.state.lock().descriptors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Deep copy of the grouping tree.
	pub fn tree_snapshot(&self) -> GroupNode<I> {
		self.state.lock().root.clone()
	}

	/// Checks every index invariant against the current state.
	pub fn verify(&self) -> Result<(), IndexError> {
		crate::invariants::check_state(&self.state.lock())
	}
}
