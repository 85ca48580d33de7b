//! Machine-checkable index invariants and their proof entrypoints.
//!
//! The checks run against a locked state through
//! [`crate::ClassificationIndex::verify`]; the proofs in `proofs.rs` drive
//! the public API and assert the checks hold after every step.

use rustc_hash::FxHashSet;
use strata_primitives::{Identifier, LEVEL_COUNT, NodeDescriptor};

use crate::classification::IndexState;
use crate::error::IndexError;
use crate::group::GroupNode;

#[cfg(doc)]
pub(crate) fn test_membership_union() {}

#[cfg(doc)]
pub(crate) fn test_remove_restores_empty_root() {}

#[cfg(doc)]
pub(crate) fn test_failed_removal_is_atomic() {}

#[cfg(doc)]
pub(crate) fn test_owner_index_tracks_removals() {}

#[cfg(doc)]
pub(crate) fn test_subset_is_deterministic() {}

#[cfg(test)]
mod proofs;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_failed_removal_is_atomic, test_membership_union, test_owner_index_tracks_removals,
	test_remove_restores_empty_root, test_subset_is_deterministic,
};

/// Invariant: membership union.
///
/// Every group's members equal the union of its children's members, children
/// at one depth are disjoint, and only the root may be empty.
pub(crate) fn check_membership_union<I: Identifier>(root: &GroupNode<I>) -> Result<(), IndexError> {
	check_node(root, 0, &mut Vec::new())
}

fn check_node<I: Identifier>(node: &GroupNode<I>, depth: usize, at: &mut Vec<String>) -> Result<(), IndexError> {
	if depth > 0 && node.is_empty() {
		return Err(violation(at, "empty group was not pruned"));
	}

	if depth == LEVEL_COUNT {
		if !node.children().is_empty() {
			return Err(violation(at, "terminal group has children"));
		}
		return Ok(());
	}

	let mut union = FxHashSet::default();
	let mut total = 0usize;
	for (key, child) in node.children() {
		at.push(key.clone());
		check_node(child, depth + 1, at)?;
		at.pop();
		total += child.members().len();
		union.extend(child.members().iter().copied());
	}
	if total != union.len() {
		return Err(violation(at, "an identifier is filed under two sibling groups"));
	}
	if &union != node.members() {
		return Err(violation(at, "members differ from the union of children"));
	}
	Ok(())
}

/// Invariant: every tracked identifier sits on exactly the path its
/// descriptor names, and the root holds nothing else.
pub(crate) fn check_lookup_agreement<I: Identifier>(state: &IndexState<I>) -> Result<(), IndexError> {
	if state.root.members().len() != state.descriptors.len()
		|| !state.descriptors.keys().all(|id| state.root.members().contains(id))
	{
		return Err(IndexError::InvariantViolated(
			"root membership differs from the tracked identifiers".into(),
		));
	}
	let batch: Vec<&NodeDescriptor<I>> = state.descriptors.values().collect();
	state.root.check_paths(&batch)
}

/// Invariant: the owner-context index mirrors descriptor owners and holds no
/// empty entries.
pub(crate) fn check_owner_index<I: Identifier>(state: &IndexState<I>) -> Result<(), IndexError> {
	let mut indexed = 0usize;
	for (owner, ids) in &state.by_owner {
		if ids.is_empty() {
			return Err(IndexError::InvariantViolated(format!("owner {owner} has an empty entry")));
		}
		for id in ids {
			let recorded = state.descriptors.get(id).and_then(NodeDescriptor::owner_context);
			if recorded != Some(*owner) {
				return Err(IndexError::InvariantViolated(format!(
					"element {id} indexed under owner {owner} but owned by {recorded:?}"
				)));
			}
		}
		indexed += ids.len();
	}
	let owned = state.descriptors.values().filter(|d| d.owner_context().is_some()).count();
	if indexed != owned {
		return Err(IndexError::InvariantViolated(format!(
			"{owned} owned elements but {indexed} indexed by owner"
		)));
	}
	Ok(())
}

pub(crate) fn check_state<I: Identifier>(state: &IndexState<I>) -> Result<(), IndexError> {
	check_membership_union(&state.root)?;
	check_lookup_agreement(state)?;
	check_owner_index(state)
}

fn violation(at: &[String], what: &str) -> IndexError {
	IndexError::InvariantViolated(format!("{what} at {at:?}"))
}
