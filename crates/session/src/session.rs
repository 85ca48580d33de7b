//! Filter session: one classification index feeding one checkbox tree.
//!
//! The host drives the session from its document events: it reports the
//! element universe and selection, asks for a refresh under a filter mode,
//! and reads the checked identifiers back for mass actions.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use strata_checktree::CheckTree;
use strata_index::{BatchReport, ClassificationIndex};
use strata_primitives::{DescriptorSource, FilterMode, HostContext, Identifier};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::movement::MoveSettings;
use crate::report::RefreshReport;

struct Observed<I> {
	all_elements: Vec<I>,
	selected_elements: Vec<I>,
	selection: FxHashSet<I>,
}

pub struct FilterSession<I: Identifier> {
	config: SessionConfig,
	index: ClassificationIndex<I>,
	tree: CheckTree<I>,
	observed: Mutex<Observed<I>>,
	/// Set by batch changes; the next refresh recomputes the subset.
	subset_stale: AtomicBool,
	movement: Mutex<MoveSettings>,
}

impl<I: Identifier> Default for FilterSession<I> {
	fn default() -> Self {
		Self::new(SessionConfig::default())
	}
}

impl<I: Identifier> FilterSession<I> {
	pub fn new(config: SessionConfig) -> Self {
		Self {
			index: ClassificationIndex::new(config.index_options()),
			tree: CheckTree::new(config.tree_options()),
			config,
			observed: Mutex::new(Observed {
				all_elements: Vec::new(),
				selected_elements: Vec::new(),
				selection: FxHashSet::default(),
			}),
			subset_stale: AtomicBool::new(false),
			movement: Mutex::new(MoveSettings::default()),
		}
	}

	/// Parses `source` as TOML and builds a session from it.
	pub fn from_toml_str(source: &str) -> Result<Self, SessionError> {
		SessionConfig::from_toml_str(source).map(Self::new)
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn index(&self) -> &ClassificationIndex<I> {
		&self.index
	}

	pub fn tree(&self) -> &CheckTree<I> {
		&self.tree
	}

	/// Records the host's element universe. Returns true if it differs, in
	/// order, from the last one recorded.
	pub fn update_all_elements(&self, ids: impl IntoIterator<Item = I>) -> bool {
		let ids: Vec<I> = ids.into_iter().collect();
		let mut observed = self.observed.lock();
		if observed.all_elements == ids {
			return false;
		}
		debug!(count = ids.len(), "element universe changed");
		observed.all_elements = ids;
		true
	}

	/// Records the host's selected elements. Returns true if `ids` names an
	/// element the recorded list lacks; only then is the list replaced, so a
	/// selection that merely shrank keeps the earlier list.
	pub fn update_selected_elements(&self, ids: impl IntoIterator<Item = I>) -> bool {
		let ids: Vec<I> = ids.into_iter().collect();
		let mut observed = self.observed.lock();
		let known: FxHashSet<I> = observed.selected_elements.iter().copied().collect();
		if ids.iter().all(|id| known.contains(id)) {
			return false;
		}
		debug!(count = ids.len(), "selected elements changed");
		observed.selected_elements = ids;
		true
	}

	/// Last list recorded by [`Self::update_selected_elements`].
	pub fn selected_elements(&self) -> Vec<I> {
		self.observed.lock().selected_elements.clone()
	}

	/// Records the host's selection. Returns true if it differs, as a set,
	/// from the last one recorded.
	pub fn did_selection_change(&self, selection: &FxHashSet<I>) -> bool {
		let mut observed = self.observed.lock();
		if observed.selection == *selection {
			return false;
		}
		observed.selection = selection.clone();
		true
	}

	/// Replaces the indexed elements with `ids`.
	pub fn set_all_elements(&self, ids: impl IntoIterator<Item = I>, source: &impl DescriptorSource<I>) -> BatchReport<I> {
		let report = self.index.replace_all(ids, source);
		self.mark_subset_stale();
		report
	}

	pub fn add_elements(&self, ids: impl IntoIterator<Item = I>, source: &impl DescriptorSource<I>) -> BatchReport<I> {
		let report = self.index.append_batch(ids, source);
		if report.applied > 0 {
			self.mark_subset_stale();
		}
		report
	}

	pub fn remove_elements(&self, ids: impl IntoIterator<Item = I>) -> Result<BatchReport<I>, SessionError> {
		let report = self.index.remove_batch(ids)?;
		if report.applied > 0 {
			self.mark_subset_stale();
		}
		Ok(report)
	}

	pub fn clear_elements(&self) {
		self.index.clear_all();
		self.mark_subset_stale();
	}

	fn mark_subset_stale(&self) {
		self.subset_stale.store(true, Ordering::Release);
	}

	/// Reconciles the tree against the active subset for `mode`.
	///
	/// The subset is recomputed unless `mode` is already active, `force` is
	/// off and no batch change happened since the last refresh. View mode
	/// always recomputes.
	pub fn refresh<H>(&self, mode: FilterMode, force: bool, host: &H) -> Result<RefreshReport<I>, SessionError>
	where
		H: HostContext<I> + DescriptorSource<I>,
	{
		let stale = self.subset_stale.swap(false, Ordering::AcqRel);
		// View recomputes anyway and reads `force` as the hidden-union trigger.
		let recompute = force || (stale && !mode.always_refresh());
		let recomputed = self.index.set_active_mode(mode, recompute, host);
		let subset = self.index.active_subset();
		let reconcile = self.tree.reconcile(subset.iter().copied(), host)?;
		let report = RefreshReport {
			mode,
			recomputed,
			subset_len: subset.len(),
			reconcile,
			summary: self.tree.summary(),
		};
		debug!(
			%mode,
			force,
			stale,
			recomputed,
			subset = report.subset_len,
			added = report.reconcile.added,
			removed = report.reconcile.removed,
			"refreshed session"
		);
		Ok(report)
	}

	/// [`Self::refresh`] under the active mode, or the configured default
	/// mode if none has been chosen yet.
	pub fn refresh_current<H>(&self, force: bool, host: &H) -> Result<RefreshReport<I>, SessionError>
	where
		H: HostContext<I> + DescriptorSource<I>,
	{
		let mode = self.index.current_mode().unwrap_or(self.config.default_mode);
		self.refresh(mode, force, host)
	}

	/// Sorted identifiers of every checked leaf.
	pub fn checked_identifiers(&self) -> Result<Vec<I>, SessionError> {
		Ok(self.tree.checked_identifiers()?)
	}

	/// Checks exactly the tree leaves the host has selected.
	///
	/// Returns `Ok(false)` and leaves the tree untouched if the host selects
	/// an element the tree does not show.
	pub fn sync_selection(&self, host: &impl HostContext<I>) -> Result<bool, SessionError> {
		let selection = host.current_selection();
		let synced = self.tree.sync_from_external_selection(&selection)?;
		if synced {
			self.observed.lock().selection = selection;
		}
		Ok(synced)
	}

	pub fn move_settings(&self) -> MoveSettings {
		*self.movement.lock()
	}

	pub fn set_copy_and_shift(&self, enabled: bool) {
		self.movement.lock().copy_and_shift = enabled;
	}

	/// # Errors
	///
	/// [`SessionError::MalformedInput`] unless exactly three components are given.
	pub fn set_displacement(&self, components: &[i32]) -> Result<(), SessionError> {
		self.movement.lock().set_displacement(components)
	}
}
