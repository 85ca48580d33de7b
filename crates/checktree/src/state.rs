//! Unguarded tree state. [`crate::CheckTree`] calls every method here while
//! holding its state lock.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use strata_primitives::{DescriptorSource, Identifier, LEVEL_COUNT, Level, NodeDescriptor, ResolveError, group_by_level};
use tracing::trace;

use crate::arena::{Arena, NodeId};
use crate::error::TreeError;
use crate::node::{BranchNode, Children, LeafNode, Node};
use crate::options::TreeOptions;
use crate::outline::{OutlineRow, RowKind};
use crate::summary::{CheckSummary, ReconcileReport};

pub(crate) struct TreeState<I: Identifier> {
	pub(crate) arena: Arena<Node<I>>,
	pub(crate) roots: BTreeMap<String, NodeId>,
	pub(crate) leaves: FxHashMap<I, NodeId>,
	pub(crate) summary: CheckSummary,
}

impl<I: Identifier> Default for TreeState<I> {
	fn default() -> Self {
		Self {
			arena: Arena::default(),
			roots: BTreeMap::new(),
			leaves: FxHashMap::default(),
			summary: CheckSummary::default(),
		}
	}
}

/// Descriptor lookups made ahead of a reconciliation.
pub(crate) type Resolved<I> = FxHashMap<I, Result<NodeDescriptor<I>, ResolveError>>;

/// Resolves `ids` through `source`. Runs without the tree lock.
pub(crate) fn resolve_all<I: Identifier>(ids: Vec<I>, source: &impl DescriptorSource<I>) -> Resolved<I> {
	ids.into_iter().map(|id| (id, source.resolve_descriptor(id))).collect()
}

impl<I: Identifier> TreeState<I> {
	pub(crate) fn branch(&self, id: NodeId) -> Result<&BranchNode<I>, TreeError> {
		match self.arena.get(id) {
			Some(Node::Branch(branch)) => Ok(branch),
			Some(Node::Leaf(_)) => Err(TreeError::NotABranch(id)),
			None => Err(TreeError::UnknownNode(id)),
		}
	}

	fn branch_mut(&mut self, id: NodeId) -> Result<&mut BranchNode<I>, TreeError> {
		match self.arena.get_mut(id) {
			Some(Node::Branch(branch)) => Ok(branch),
			Some(Node::Leaf(_)) => Err(TreeError::NotABranch(id)),
			None => Err(TreeError::UnknownNode(id)),
		}
	}

	/// Applies `desired` to the tree. `resolved` carries descriptors looked up
	/// before the lock was taken; identifiers missing from it are resolved
	/// through `source` here.
	///
	/// Every fallible check runs before the first mutation.
	pub(crate) fn reconcile(
		&mut self,
		desired: &FxHashSet<I>,
		mut resolved: Resolved<I>,
		source: &impl DescriptorSource<I>,
		options: &TreeOptions,
	) -> Result<ReconcileReport<I>, TreeError> {
		let mut report = ReconcileReport::default();

		let mut to_remove: Vec<I> = self.leaves.keys().filter(|id| !desired.contains(id)).copied().collect();
		to_remove.sort_unstable();
		let mut to_add = self.missing_leaves(desired);
		to_add.sort_unstable();

		let mut fresh = Vec::with_capacity(to_add.len());
		for id in to_add {
			let outcome = resolved.remove(&id).unwrap_or_else(|| source.resolve_descriptor(id));
			match outcome {
				Ok(desc) if desc.id() == id => fresh.push(desc),
				Ok(desc) => {
					trace!(%id, returned = %desc.id(), "descriptor source answered for another element");
					report.unresolved.push((id, ResolveError::not_found(id)));
				}
				Err(err) => {
					trace!(%id, error = %err, "no leaf for unresolvable element");
					report.unresolved.push((id, err));
				}
			}
		}

		for id in &to_remove {
			self.check_leaf_chain(*id)?;
		}
		for desc in &fresh {
			self.check_attach_path(desc)?;
		}

		let mut touched = FxHashSet::default();
		for id in &to_remove {
			self.detach_leaf(*id, &mut touched)?;
		}
		let batch: Vec<&NodeDescriptor<I>> = fresh.iter().collect();
		self.attach(None, &batch, Level::CategoryType, &mut touched)?;

		if options.auto_expand {
			for handle in &touched {
				if let Some(branch) = self.arena.get_mut(*handle).and_then(Node::as_branch_mut) {
					branch.expanded = true;
				}
			}
		}

		self.recount_all()?;
		report.added = fresh.len();
		report.removed = to_remove.len();
		Ok(report)
	}

	/// Identifiers in `desired` that have no leaf yet.
	pub(crate) fn missing_leaves(&self, desired: &FxHashSet<I>) -> Vec<I> {
		desired.iter().filter(|id| !self.leaves.contains_key(id)).copied().collect()
	}

	/// Confirms every existing branch along `desc`'s path can take a new
	/// child, so attaching it cannot fail after leaves were detached.
	fn check_attach_path(&self, desc: &NodeDescriptor<I>) -> Result<(), TreeError> {
		let mut parent = None;
		for level in Level::ALL {
			let key = desc.key(level);
			let existing = match parent {
				None => self.roots.get(key).copied(),
				Some(up) => match &self.branch(up)?.children {
					Children::Branches(map) => map.get(key).copied(),
					Children::Leaves(_) => {
						return Err(TreeError::inconsistent(format!(
							"branch {key:?} for {} requested below the terminal level",
							desc.id()
						)));
					}
				},
			};
			let Some(handle) = existing else {
				return Ok(());
			};
			self.branch(handle)?;
			parent = Some(handle);
		}
		if let Some(up) = parent
			&& !matches!(self.branch(up)?.children, Children::Leaves(_))
		{
			return Err(TreeError::inconsistent(format!("terminal branch for {} holds no leaves", desc.id())));
		}
		Ok(())
	}

	/// Confirms `id` has a leaf whose parent links reach a registered root.
	fn check_leaf_chain(&self, id: I) -> Result<(), TreeError> {
		let handle = self
			.leaves
			.get(&id)
			.copied()
			.ok_or_else(|| TreeError::inconsistent(format!("element {id} missing from leaf index")))?;
		let parent = match self.arena.get(handle) {
			Some(Node::Leaf(leaf)) if leaf.id == id => leaf.parent,
			_ => return Err(TreeError::inconsistent(format!("leaf index entry for {id} is stale"))),
		};
		match &self.branch(parent)?.children {
			Children::Leaves(map) if map.get(&id) == Some(&handle) => {}
			_ => return Err(TreeError::inconsistent(format!("element {id} not listed under its parent"))),
		}

		let mut current = parent;
		for _ in 0..LEVEL_COUNT {
			let branch = self.branch(current)?;
			let Some(up) = branch.parent else {
				if self.roots.get(&branch.key) == Some(&current) {
					return Ok(());
				}
				return Err(TreeError::inconsistent(format!("root branch {:?} is not registered", branch.key)));
			};
			let listed = matches!(
				&self.branch(up)?.children,
				Children::Branches(map) if map.get(&branch.key) == Some(&current)
			);
			if !listed {
				return Err(TreeError::inconsistent(format!("branch {:?} not listed under its parent", branch.key)));
			}
			current = up;
		}
		Err(TreeError::inconsistent(format!("parent chain of {id} is deeper than the hierarchy")))
	}

	/// Removes the leaf for `id`, decrementing totals on the way up and
	/// pruning branches that run out of leaves.
	fn detach_leaf(&mut self, id: I, touched: &mut FxHashSet<NodeId>) -> Result<(), TreeError> {
		let handle = self
			.leaves
			.remove(&id)
			.ok_or_else(|| TreeError::inconsistent(format!("element {id} missing from leaf index")))?;
		let parent = match self.arena.remove(handle) {
			Some(Node::Leaf(leaf)) => leaf.parent,
			_ => return Err(TreeError::inconsistent(format!("leaf index entry for {id} is stale"))),
		};
		if let Children::Leaves(map) = &mut self.branch_mut(parent)?.children {
			map.remove(&id);
		}

		let mut current = Some(parent);
		while let Some(handle) = current {
			let branch = self.branch_mut(handle)?;
			branch.total_leaves = branch.total_leaves.saturating_sub(1);
			let up = branch.parent;
			if branch.total_leaves == 0 {
				let key = branch.key.clone();
				self.arena.remove(handle);
				touched.remove(&handle);
				match up {
					None => {
						self.roots.remove(&key);
					}
					Some(up) => {
						if let Children::Branches(map) = &mut self.branch_mut(up)?.children {
							map.remove(&key);
						}
					}
				}
			} else {
				touched.insert(handle);
			}
			current = up;
		}
		Ok(())
	}

	/// Files `batch` below `parent`, grouping by `level` and creating
	/// branches on demand.
	fn attach(
		&mut self,
		parent: Option<NodeId>,
		batch: &[&NodeDescriptor<I>],
		level: Level,
		touched: &mut FxHashSet<NodeId>,
	) -> Result<(), TreeError> {
		for (key, group) in group_by_level(batch, level) {
			let branch = self.ensure_branch(parent, key, level)?;
			touched.insert(branch);
			self.branch_mut(branch)?.total_leaves += group.len();

			let Some(next) = level.next() else {
				for desc in group {
					let leaf = self.arena.insert(Node::Leaf(LeafNode {
						id: desc.id(),
						path: desc.path().clone(),
						parent: branch,
						checked: false,
					}));
					if let Children::Leaves(map) = &mut self.branch_mut(branch)?.children {
						map.insert(desc.id(), leaf);
					}
					self.leaves.insert(desc.id(), leaf);
				}
				continue;
			};
			self.attach(Some(branch), &group, next, touched)?;
		}
		Ok(())
	}

	fn ensure_branch(&mut self, parent: Option<NodeId>, key: &str, level: Level) -> Result<NodeId, TreeError> {
		let existing = match parent {
			None => self.roots.get(key).copied(),
			Some(up) => match &self.branch(up)?.children {
				Children::Branches(map) => map.get(key).copied(),
				Children::Leaves(_) => return Err(TreeError::inconsistent("branch requested below the terminal level")),
			},
		};
		if let Some(handle) = existing {
			return Ok(handle);
		}

		let handle = self.arena.insert(Node::Branch(BranchNode::new(key, level, parent)));
		match parent {
			None => {
				self.roots.insert(key.to_string(), handle);
			}
			Some(up) => {
				if let Children::Branches(map) = &mut self.branch_mut(up)?.children {
					map.insert(key.to_string(), handle);
				}
			}
		}
		Ok(handle)
	}

	/// Recomputes checked counters and flags below `handle`. Returns the
	/// branch's checked leaf count.
	fn recount(&mut self, handle: NodeId) -> Result<usize, TreeError> {
		let children = self.branch(handle)?.children.handles();
		let mut checked = 0;
		for child in children {
			checked += match self.arena.get(child) {
				Some(Node::Leaf(leaf)) => usize::from(leaf.checked),
				Some(Node::Branch(_)) => self.recount(child)?,
				None => return Err(TreeError::inconsistent(format!("child {child} of {handle} is gone"))),
			};
		}
		let branch = self.branch_mut(handle)?;
		branch.checked_leaves = checked;
		branch.checked = branch.total_leaves > 0 && checked == branch.total_leaves;
		Ok(checked)
	}

	fn recount_all(&mut self) -> Result<(), TreeError> {
		let roots: Vec<NodeId> = self.roots.values().copied().collect();
		for root in roots {
			self.recount(root)?;
		}
		self.refresh_summary();
		Ok(())
	}

	fn refresh_summary(&mut self) {
		let checked = self
			.roots
			.values()
			.filter_map(|root| self.arena.get(*root).and_then(Node::as_branch))
			.map(|branch| branch.checked_leaves)
			.sum::<usize>();
		self.summary = CheckSummary {
			checked,
			total: self.leaves.len(),
		};
	}

	pub(crate) fn toggle_check(&mut self, handle: NodeId, desired: bool) -> Result<(), TreeError> {
		let Some(node) = self.arena.get_mut(handle) else {
			return Err(TreeError::UnknownNode(handle));
		};
		let parent = node.parent();
		match node {
			Node::Leaf(leaf) => leaf.checked = desired,
			Node::Branch(_) => self.set_subtree(handle, desired)?,
		}
		let root = self.propagate_up(parent)?.unwrap_or(handle);
		self.recount(root)?;
		self.refresh_summary();
		Ok(())
	}

	/// Forces every leaf and branch below `handle` to `desired`.
	fn set_subtree(&mut self, handle: NodeId, desired: bool) -> Result<(), TreeError> {
		let children = self.branch(handle)?.children.handles();
		for child in children {
			match self.arena.get_mut(child) {
				Some(Node::Leaf(leaf)) => leaf.checked = desired,
				Some(Node::Branch(_)) => self.set_subtree(child, desired)?,
				None => return Err(TreeError::inconsistent(format!("child {child} of {handle} is gone"))),
			}
		}
		let branch = self.branch_mut(handle)?;
		branch.checked = desired && branch.total_leaves > 0;
		Ok(())
	}

	/// Recomputes each ancestor's flag as "all children checked", starting at
	/// `from`. Returns the root branch reached.
	fn propagate_up(&mut self, from: Option<NodeId>) -> Result<Option<NodeId>, TreeError> {
		let mut reached = None;
		let mut current = from;
		while let Some(handle) = current {
			let all_checked = {
				let branch = self.branch(handle)?;
				!branch.children.is_empty()
					&& branch
						.children
						.handles()
						.into_iter()
						.all(|child| self.arena.get(child).is_some_and(Node::is_checked))
			};
			let branch = self.branch_mut(handle)?;
			branch.checked = all_checked;
			reached = Some(handle);
			current = branch.parent;
		}
		Ok(reached)
	}

	pub(crate) fn sync_selection(&mut self, selected: &FxHashSet<I>) -> Result<bool, TreeError> {
		if let Some(stale) = selected.iter().find(|id| !self.leaves.contains_key(id)) {
			trace!(%stale, "external selection names an element with no leaf");
			return Ok(false);
		}

		let mut flipped = Vec::new();
		for (id, handle) in &self.leaves {
			let want = selected.contains(id);
			if let Some(leaf) = self.arena.get_mut(*handle).and_then(Node::as_leaf_mut)
				&& leaf.checked != want
			{
				leaf.checked = want;
				flipped.push(leaf.parent);
			}
		}

		let mut roots = FxHashSet::default();
		for parent in flipped {
			if let Some(root) = self.propagate_up(Some(parent))? {
				roots.insert(root);
			}
		}
		for root in roots {
			self.recount(root)?;
		}
		self.refresh_summary();
		Ok(true)
	}

	/// Expands every branch at and below `handle`.
	fn expand_subtree(&mut self, handle: NodeId) -> Result<(), TreeError> {
		self.branch_mut(handle)?.expanded = true;
		let children = self.branch(handle)?.children.handles();
		for child in children {
			if matches!(self.arena.get(child), Some(Node::Branch(_))) {
				self.expand_subtree(child)?;
			}
		}
		Ok(())
	}

	/// Returns true if the branch's subtree was expanded, false if its
	/// children were collapsed.
	pub(crate) fn toggle_collapse(&mut self, handle: NodeId) -> Result<bool, TreeError> {
		let children = self.branch(handle)?.children.handles();
		let all_collapsed = children.iter().all(|child| match self.arena.get(*child) {
			Some(Node::Branch(branch)) => !branch.expanded,
			_ => true,
		});
		if all_collapsed {
			self.expand_subtree(handle)?;
			return Ok(true);
		}
		for child in children {
			if let Some(branch) = self.arena.get_mut(child).and_then(Node::as_branch_mut) {
				branch.expanded = false;
			}
		}
		Ok(false)
	}

	pub(crate) fn checked_snapshot(&self) -> (Vec<I>, usize) {
		let checked = self
			.leaves
			.values()
			.filter_map(|handle| self.arena.get(*handle).and_then(Node::as_leaf))
			.filter(|leaf| leaf.checked)
			.map(|leaf| leaf.id)
			.collect();
		let visited = self.leaves.values().filter(|handle| self.arena.contains(**handle)).count();
		(checked, visited)
	}

	pub(crate) fn branch_at<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
		let (first, rest) = path.split_first()?;
		let mut current = *self.roots.get(first.as_ref())?;
		for key in rest {
			current = match &self.branch(current).ok()?.children {
				Children::Branches(map) => *map.get(key.as_ref())?,
				Children::Leaves(_) => return None,
			};
		}
		Some(current)
	}

	pub(crate) fn outline(&self) -> Vec<OutlineRow<I>> {
		let mut rows = Vec::with_capacity(self.arena.len());
		for root in self.roots.values() {
			self.outline_into(*root, 0, &mut rows);
		}
		rows
	}

	fn outline_into(&self, handle: NodeId, depth: usize, rows: &mut Vec<OutlineRow<I>>) {
		match self.arena.get(handle) {
			Some(Node::Branch(branch)) => {
				rows.push(OutlineRow {
					depth,
					handle,
					kind: RowKind::Branch,
					label: branch.counter_label(),
					checked: branch.checked,
					expanded: branch.expanded,
				});
				for child in branch.children.handles() {
					self.outline_into(child, depth + 1, rows);
				}
			}
			Some(Node::Leaf(leaf)) => rows.push(OutlineRow {
				depth,
				handle,
				kind: RowKind::Leaf(leaf.id),
				label: leaf.id.to_string(),
				checked: leaf.checked,
				expanded: false,
			}),
			None => {}
		}
	}
}
