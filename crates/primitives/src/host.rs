//! Contracts the host application implements.
//!
//! The classification core never talks to a document directly. It asks a
//! [`DescriptorSource`] for classification keys and a [`HostContext`] for the
//! host's live selection and view state. [`MemoryHost`] is a self-contained
//! implementation of both, used by tests and by hosts that mirror their
//! document into memory.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::NodeDescriptor;
use crate::error::ResolveError;
use crate::hidden::HiddenTracker;
use crate::ids::Identifier;

/// Resolves an identifier to its classification descriptor.
pub trait DescriptorSource<I: Identifier> {
	/// Returns the descriptor for `id`, or why it cannot be produced.
	fn resolve_descriptor(&self, id: I) -> Result<NodeDescriptor<I>, ResolveError>;
}

impl<I, F> DescriptorSource<I> for F
where
	I: Identifier,
	F: Fn(I) -> Result<NodeDescriptor<I>, ResolveError>,
{
	fn resolve_descriptor(&self, id: I) -> Result<NodeDescriptor<I>, ResolveError> {
		self(id)
	}
}

/// Live selection and view state owned by the host.
pub trait HostContext<I: Identifier> {
	/// Identifiers currently selected in the host.
	fn current_selection(&self) -> FxHashSet<I>;

	/// Active viewing context, or `None` if there is none or it is invalid.
	fn current_view(&self) -> Option<I>;

	/// Identifiers hidden in `context` that should still count as part of it.
	fn hidden_tracked(&self, context: I) -> FxHashSet<I>;
}

/// In-memory host: a descriptor table plus selection, view and hidden state.
#[derive(Debug, Clone)]
pub struct MemoryHost<I: Identifier> {
	descriptors: FxHashMap<I, NodeDescriptor<I>>,
	selection: FxHashSet<I>,
	view: Option<I>,
	hidden: HiddenTracker<I>,
}

impl<I: Identifier> Default for MemoryHost<I> {
	fn default() -> Self {
		Self {
			descriptors: FxHashMap::default(),
			selection: FxHashSet::default(),
			view: None,
			hidden: HiddenTracker::default(),
		}
	}
}

impl<I: Identifier> MemoryHost<I> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a descriptor.
	pub fn insert(&mut self, descriptor: NodeDescriptor<I>) {
		self.descriptors.insert(descriptor.id(), descriptor);
	}

	/// Forgets a descriptor, so later resolution of `id` fails.
	pub fn forget(&mut self, id: I) -> Option<NodeDescriptor<I>> {
		self.descriptors.remove(&id)
	}

	/// Every identifier with a descriptor, sorted.
	pub fn ids(&self) -> Vec<I> {
		let mut ids: Vec<I> = self.descriptors.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	pub fn set_selection(&mut self, selection: impl IntoIterator<Item = I>) {
		self.selection = selection.into_iter().collect();
	}

	pub fn set_view(&mut self, view: Option<I>) {
		self.view = view;
	}

	pub fn hidden(&self) -> &HiddenTracker<I> {
		&self.hidden
	}

	pub fn hidden_mut(&mut self) -> &mut HiddenTracker<I> {
		&mut self.hidden
	}
}

impl<I: Identifier> DescriptorSource<I> for MemoryHost<I> {
	fn resolve_descriptor(&self, id: I) -> Result<NodeDescriptor<I>, ResolveError> {
		self.descriptors.get(&id).cloned().ok_or_else(|| ResolveError::not_found(id))
	}
}

impl<I: Identifier> HostContext<I> for MemoryHost<I> {
	fn current_selection(&self) -> FxHashSet<I> {
		self.selection.clone()
	}

	fn current_view(&self) -> Option<I> {
		self.view
	}

	fn hidden_tracked(&self, context: I) -> FxHashSet<I> {
		self.hidden.hidden_in(context)
	}
}
