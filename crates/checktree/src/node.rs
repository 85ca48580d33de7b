//! Branch and leaf records stored in the arena.
//!
//! Nodes are plain data. Rendering belongs to the presentation layer, which
//! reads them through [`crate::CheckTree::node`] and [`crate::CheckTree::outline`].

use std::collections::BTreeMap;

use strata_primitives::{ClassificationPath, Identifier, Level};

use crate::arena::NodeId;

/// A node of the checkbox tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<I: Identifier> {
	Branch(BranchNode<I>),
	Leaf(LeafNode<I>),
}

impl<I: Identifier> Node<I> {
	pub fn as_branch(&self) -> Option<&BranchNode<I>> {
		match self {
			Node::Branch(branch) => Some(branch),
			Node::Leaf(_) => None,
		}
	}

	pub fn as_leaf(&self) -> Option<&LeafNode<I>> {
		match self {
			Node::Leaf(leaf) => Some(leaf),
			Node::Branch(_) => None,
		}
	}

	pub(crate) fn as_branch_mut(&mut self) -> Option<&mut BranchNode<I>> {
		match self {
			Node::Branch(branch) => Some(branch),
			Node::Leaf(_) => None,
		}
	}

	pub(crate) fn as_leaf_mut(&mut self) -> Option<&mut LeafNode<I>> {
		match self {
			Node::Leaf(leaf) => Some(leaf),
			Node::Branch(_) => None,
		}
	}

	/// Parent branch, or `None` for a root branch.
	pub fn parent(&self) -> Option<NodeId> {
		match self {
			Node::Branch(branch) => branch.parent,
			Node::Leaf(leaf) => Some(leaf.parent),
		}
	}

	/// Checkbox state.
	pub fn is_checked(&self) -> bool {
		match self {
			Node::Branch(branch) => branch.checked,
			Node::Leaf(leaf) => leaf.checked,
		}
	}
}

/// Children of a branch: sub-branches above the terminal level, leaves below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children<I: Identifier> {
	Branches(BTreeMap<String, NodeId>),
	Leaves(BTreeMap<I, NodeId>),
}

impl<I: Identifier> Children<I> {
	pub(crate) fn for_level(level: Level) -> Self {
		if level.is_terminal() {
			Children::Leaves(BTreeMap::new())
		} else {
			Children::Branches(BTreeMap::new())
		}
	}

	/// Child handles in key order.
	pub fn handles(&self) -> Vec<NodeId> {
		match self {
			Children::Branches(map) => map.values().copied().collect(),
			Children::Leaves(map) => map.values().copied().collect(),
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Children::Branches(map) => map.len(),
			Children::Leaves(map) => map.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// One classification value at one depth, aggregating the leaves below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode<I: Identifier> {
	pub(crate) key: String,
	pub(crate) level: Level,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Children<I>,
	pub(crate) total_leaves: usize,
	pub(crate) checked_leaves: usize,
	pub(crate) checked: bool,
	pub(crate) expanded: bool,
}

impl<I: Identifier> BranchNode<I> {
	pub(crate) fn new(key: &str, level: Level, parent: Option<NodeId>) -> Self {
		Self {
			key: key.to_string(),
			level,
			parent,
			children: Children::for_level(level),
			total_leaves: 0,
			checked_leaves: 0,
			checked: false,
			expanded: false,
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn level(&self) -> Level {
		self.level
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn children(&self) -> &Children<I> {
		&self.children
	}

	/// Leaves anywhere below this branch.
	pub fn total_leaves(&self) -> usize {
		self.total_leaves
	}

	/// Checked leaves anywhere below this branch.
	pub fn checked_leaves(&self) -> usize {
		self.checked_leaves
	}

	pub fn is_checked(&self) -> bool {
		self.checked
	}

	pub fn is_expanded(&self) -> bool {
		self.expanded
	}

	/// Returns true if some but not all leaves below are checked.
	pub fn is_partial(&self) -> bool {
		self.checked_leaves > 0 && self.checked_leaves < self.total_leaves
	}

	/// Display label with leaf counters, e.g. `"[ 2/5 ] Walls"`.
	pub fn counter_label(&self) -> String {
		format!("[ {}/{} ] {}", self.checked_leaves, self.total_leaves, self.key)
	}
}

/// One tracked identifier with its classification keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode<I: Identifier> {
	pub(crate) id: I,
	pub(crate) path: ClassificationPath,
	pub(crate) parent: NodeId,
	pub(crate) checked: bool,
}

impl<I: Identifier> LeafNode<I> {
	pub fn id(&self) -> I {
		self.id
	}

	pub fn path(&self) -> &ClassificationPath {
		&self.path
	}

	pub fn parent(&self) -> NodeId {
		self.parent
	}

	pub fn is_checked(&self) -> bool {
		self.checked
	}
}

#[cfg(test)]
mod tests {
	use strata_primitives::ElementId;

	use super::*;

	#[test]
	fn counter_label_shows_checked_over_total() {
		let mut branch = BranchNode::<ElementId>::new("Walls", Level::Category, None);
		branch.total_leaves = 5;
		branch.checked_leaves = 2;
		assert_eq!(branch.counter_label(), "[ 2/5 ] Walls");
		assert!(branch.is_partial());
	}

	#[test]
	fn terminal_branches_hold_leaves() {
		let branch = BranchNode::<ElementId>::new("200mm", Level::ElementType, None);
		assert!(matches!(branch.children(), Children::Leaves(_)));
		let branch = BranchNode::<ElementId>::new("Walls", Level::Category, None);
		assert!(matches!(branch.children(), Children::Branches(_)));
	}
}
