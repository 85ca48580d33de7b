//! Grouping tree nodes and the recursive batch walks over them.
//!
//! # Invariants
//!
//! - A node's members equal the union of its children's members; nodes below
//!   [`Level::ElementType`] hold instance identifiers directly.
//! - A non-root node with no members is removed from its parent.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use strata_primitives::{Identifier, Level, NodeDescriptor, group_by_level};

use crate::error::IndexError;

/// Name of the root group.
pub const ROOT_NAME: &str = "All";

/// One node of the classification tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode<I: Identifier> {
	name: String,
	children: BTreeMap<String, GroupNode<I>>,
	members: FxHashSet<I>,
}

impl<I: Identifier> GroupNode<I> {
	/// Creates an empty root group.
	pub fn root() -> Self {
		Self::named(ROOT_NAME)
	}

	fn named(name: &str) -> Self {
		Self {
			name: name.to_string(),
			children: BTreeMap::new(),
			members: FxHashSet::default(),
		}
	}

	/// Classification value this node is keyed by (`"All"` for the root).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Child groups keyed by their classification value.
	pub fn children(&self) -> &BTreeMap<String, GroupNode<I>> {
		&self.children
	}

	/// Child group keyed by `key`.
	pub fn child(&self, key: &str) -> Option<&GroupNode<I>> {
		self.children.get(key)
	}

	/// Flattened membership of this node and all descendants.
	pub fn members(&self) -> &FxHashSet<I> {
		&self.members
	}

	/// Returns true if no identifier is filed under this node.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	pub(crate) fn clear(&mut self) {
		self.children.clear();
		self.members.clear();
	}

	/// Files `batch` under this node, grouping by `level` and descending.
	///
	/// `None` means this node sits below the terminal level and takes the
	/// identifiers directly.
	pub(crate) fn insert_grouped(&mut self, batch: &[&NodeDescriptor<I>], level: Option<Level>) {
		let Some(level) = level else {
			self.members.extend(batch.iter().map(|d| d.id()));
			return;
		};

		for (key, group) in group_by_level(batch, level) {
			let child = self
				.children
				.entry(key.to_string())
				.or_insert_with(|| GroupNode::named(key));
			child.insert_grouped(&group, level.next());
			self.members.extend(group.iter().map(|d| d.id()));
		}
	}

	/// Confirms every descriptor in `batch` has a live branch under this node.
	///
	/// Run before [`Self::remove_grouped`] so a bad batch is rejected without
	/// touching the tree.
	pub(crate) fn check_paths(&self, batch: &[&NodeDescriptor<I>]) -> Result<(), IndexError> {
		for desc in batch {
			let mut node = self;
			let mut at = Vec::new();
			for (_, key) in desc.path().iter() {
				at.push(key.to_string());
				node = node.children.get(key).ok_or_else(|| IndexError::Inconsistent {
					id: desc.id().to_string(),
					at: at.clone(),
					detail: "missing group",
				})?;
			}
			if !node.members.contains(&desc.id()) {
				return Err(IndexError::Inconsistent {
					id: desc.id().to_string(),
					at,
					detail: "not a member of its terminal group",
				});
			}
		}
		Ok(())
	}

	/// Removes `batch` from this node and below, pruning emptied children.
	pub(crate) fn remove_grouped(&mut self, batch: &[&NodeDescriptor<I>], level: Option<Level>) {
		let Some(level) = level else {
			for desc in batch {
				self.members.remove(&desc.id());
			}
			return;
		};

		for (key, group) in group_by_level(batch, level) {
			if let Some(child) = self.children.get_mut(key) {
				child.remove_grouped(&group, level.next());
				if child.is_empty() {
					self.children.remove(key);
				}
			}
			for desc in &group {
				self.members.remove(&desc.id());
			}
		}
	}
}
