//! Machine-checkable checkbox tree invariants and their proof entrypoints.

use strata_primitives::{Identifier, Level};

use crate::arena::NodeId;
use crate::error::TreeError;
use crate::node::{BranchNode, Children, Node};
use crate::state::TreeState;

#[cfg(doc)]
pub(crate) fn test_counter_sum() {}

#[cfg(doc)]
pub(crate) fn test_branch_check_is_uniform() {}

#[cfg(doc)]
pub(crate) fn test_reconcile_preserves_checked() {}

#[cfg(doc)]
pub(crate) fn test_empty_branches_are_pruned() {}

#[cfg(doc)]
pub(crate) fn test_stale_selection_is_rejected() {}

#[cfg(test)]
mod proofs;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_branch_check_is_uniform, test_counter_sum, test_empty_branches_are_pruned,
	test_reconcile_preserves_checked, test_stale_selection_is_rejected,
};

/// Leaf and checked-leaf counts of a subtree.
#[derive(Default)]
struct Tally {
	total: usize,
	checked: usize,
}

/// Invariant: counter sum.
///
/// Every branch's `checked_leaves` and `total_leaves` equal the sums over its
/// children, its flag equals `checked_leaves == total_leaves > 0`, and no
/// branch is empty.
pub(crate) fn check_counters<I: Identifier>(state: &TreeState<I>) -> Result<(), TreeError> {
	let mut total = Tally::default();
	for root in state.roots.values() {
		let tally = tally_branch(state, *root)?;
		total.total += tally.total;
		total.checked += tally.checked;
	}
	if total.total != state.summary.total || total.checked != state.summary.checked {
		return Err(TreeError::InvariantViolated(format!(
			"summary {} disagrees with {} of {} leaves checked",
			state.summary, total.checked, total.total
		)));
	}
	Ok(())
}

fn tally_branch<I: Identifier>(state: &TreeState<I>, handle: NodeId) -> Result<Tally, TreeError> {
	let branch = state.branch(handle)?;
	let mut tally = Tally::default();
	for child in branch.children().handles() {
		match state.arena.get(child) {
			Some(Node::Leaf(leaf)) => {
				tally.total += 1;
				tally.checked += usize::from(leaf.checked);
			}
			Some(Node::Branch(_)) => {
				let sub = tally_branch(state, child)?;
				tally.total += sub.total;
				tally.checked += sub.checked;
			}
			None => return Err(violation(branch, "lists a dead child")),
		}
	}

	if tally.total == 0 {
		return Err(violation(branch, "is empty but was not pruned"));
	}
	if branch.total_leaves != tally.total {
		return Err(violation(branch, "total_leaves differs from its leaf count"));
	}
	if branch.checked_leaves != tally.checked {
		return Err(violation(branch, "checked_leaves differs from the sum over children"));
	}
	if branch.checked != (tally.checked == tally.total) {
		return Err(violation(branch, "checked flag disagrees with its counters"));
	}
	Ok(tally)
}

/// Invariant: parent links, child maps, levels and the leaf index agree.
pub(crate) fn check_links<I: Identifier>(state: &TreeState<I>) -> Result<(), TreeError> {
	for (key, root) in &state.roots {
		let branch = state.branch(*root)?;
		if branch.parent.is_some() || branch.level != Level::CategoryType || &branch.key != key {
			return Err(violation(branch, "is registered as a root but is not one"));
		}
	}

	let mut leaf_count = 0;
	for (handle, node) in state.arena.iter() {
		match node {
			Node::Leaf(leaf) => {
				leaf_count += 1;
				if state.leaves.get(&leaf.id) != Some(&handle) {
					return Err(TreeError::InvariantViolated(format!("leaf {} missing from the leaf index", leaf.id)));
				}
				let listed = matches!(
					&state.branch(leaf.parent)?.children,
					Children::Leaves(map) if map.get(&leaf.id) == Some(&handle)
				);
				if !listed {
					return Err(TreeError::InvariantViolated(format!("leaf {} not listed by its parent", leaf.id)));
				}
			}
			Node::Branch(branch) => {
				for child in branch.children().handles() {
					let linked = state.arena.get(child).and_then(Node::parent) == Some(handle);
					if !linked {
						return Err(violation(branch, "has a child whose parent link points elsewhere"));
					}
					if let Some(Node::Branch(sub)) = state.arena.get(child)
						&& Some(sub.level) != branch.level.next()
					{
						return Err(violation(branch, "has a child at the wrong level"));
					}
				}
				let reachable = match branch.parent {
					None => state.roots.get(&branch.key) == Some(&handle),
					Some(up) => matches!(
						&state.branch(up)?.children,
						Children::Branches(map) if map.get(&branch.key) == Some(&handle)
					),
				};
				if !reachable {
					return Err(violation(branch, "is not listed by its parent"));
				}
			}
		}
	}

	if leaf_count != state.leaves.len() {
		return Err(TreeError::InvariantViolated(format!(
			"{leaf_count} leaves stored but {} indexed",
			state.leaves.len()
		)));
	}
	Ok(())
}

pub(crate) fn check_state<I: Identifier>(state: &TreeState<I>) -> Result<(), TreeError> {
	check_links(state)?;
	check_counters(state)
}

fn violation<I: Identifier>(branch: &BranchNode<I>, what: &str) -> TreeError {
	TreeError::InvariantViolated(format!("{} branch {:?} {what}", branch.level, branch.key))
}
