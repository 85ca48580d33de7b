use strata_primitives::{ElementId, FilterMode, Level};

use super::*;
use crate::classification::ClassificationIndex;
use crate::test_fixtures::{desc, id, sample_host};

/// Invariant: membership union holds after every append and removal.
#[cfg_attr(test, test)]
pub(crate) fn test_membership_union() {
	let host = sample_host();
	let index = ClassificationIndex::default();
	index.append_batch([id(1), id(2)], &host);
	index.verify().unwrap();
	index.append_batch([id(3)], &host);
	index.verify().unwrap();
	index.remove_batch([id(2)]).unwrap();
	index.verify().unwrap();

	let tree = index.tree_snapshot();
	check_membership_union(&tree).unwrap();
	assert_eq!(tree.members().len(), 2);
}

/// Invariant: removing every appended identifier restores an empty root.
#[cfg_attr(test, test)]
pub(crate) fn test_remove_restores_empty_root() {
	let host = sample_host();
	let index = ClassificationIndex::default();
	index.append_batch(host.ids(), &host);
	index.remove_batch(host.ids()).unwrap();

	let tree = index.tree_snapshot();
	assert!(tree.is_empty());
	assert!(tree.children().is_empty());
	index.verify().unwrap();
}

/// Invariant: a removal that hits a missing branch mutates nothing.
#[cfg_attr(test, test)]
pub(crate) fn test_failed_removal_is_atomic() {
	let host = sample_host();
	let index = ClassificationIndex::default();
	index.append_batch(host.ids(), &host);

	// Drift the lookup away from the tree: element 3 now claims a path
	// that was never filed.
	index.state.lock().descriptors.insert(id(3), desc(3, Some(100), ["Struct", "Beams", "Steel", "W10"]));
	let before = index.tree_snapshot();

	let err = index.remove_batch([id(1), id(3)]).unwrap_err();
	assert!(matches!(err, IndexError::Inconsistent { .. }));
	assert_eq!(index.tree_snapshot(), before);
	assert!(index.contains(id(1)));
	assert!(index.verify().is_err());
}

/// Invariant: the owner index follows descriptor owners through removals.
#[cfg_attr(test, test)]
pub(crate) fn test_owner_index_tracks_removals() {
	let host = sample_host();
	let index = ClassificationIndex::default();
	index.append_batch(host.ids(), &host);
	assert_eq!(index.identifiers_in_context(id(100)).len(), 2);

	index.remove_batch([id(1), id(3)]).unwrap();
	assert!(index.identifiers_in_context(id(100)).is_empty());
	check_owner_index(&index.state.lock()).unwrap();
}

/// Invariant: the same mode and sources always yield the same subset.
#[cfg_attr(test, test)]
pub(crate) fn test_subset_is_deterministic() {
	let mut host = sample_host();
	host.set_view(Some(ElementId(100)));
	let index = ClassificationIndex::default();
	index.append_batch(host.ids(), &host);

	index.set_active_mode(FilterMode::View, false, &host);
	let first = index.active_subset();
	index.set_active_mode(FilterMode::Project, false, &host);
	index.set_active_mode(FilterMode::View, false, &host);
	assert_eq!(*index.active_subset(), *first);
}

/// Invariant: a corrupted group is reported by the membership check.
#[cfg_attr(test, test)]
pub(crate) fn test_detects_orphan_member() {
	let host = sample_host();
	let index = ClassificationIndex::default();
	index.append_batch(host.ids(), &host);

	let ghost = desc(9, None, ["Ghost", "Ghost", "Ghost", "Ghost"]);
	let mut state = index.state.lock();
	state.root.insert_grouped(&[&ghost], Some(Level::CategoryType));
	assert!(check_membership_union(&state.root).is_ok());
	assert!(check_lookup_agreement(&state).is_err());
}
