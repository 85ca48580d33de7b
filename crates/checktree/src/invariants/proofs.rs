use rustc_hash::FxHashSet;
use strata_primitives::ElementId;

use super::*;
use crate::test_fixtures::{id, sample_host};
use crate::tree::CheckTree;

fn checked(tree: &CheckTree<ElementId>, handle: NodeId) -> bool {
	tree.node(handle).is_some_and(|node| node.is_checked())
}

/// Invariant: counters equal the sums over children after every mutation.
#[cfg_attr(test, test)]
pub(crate) fn test_counter_sum() {
	let host = sample_host();
	let tree = CheckTree::default();
	tree.reconcile([id(10), id(11), id(20)], &host).unwrap();
	tree.verify().unwrap();

	tree.toggle_check(tree.leaf(id(10)).unwrap(), true).unwrap();
	tree.verify().unwrap();
	tree.reconcile([id(10), id(12), id(30)], &host).unwrap();
	tree.verify().unwrap();

	let state = tree.state.lock();
	check_counters(&state).unwrap();
	assert_eq!(state.summary.checked, 1);
	assert_eq!(state.summary.total, 3);
}

/// Invariant: a toggled branch forces its whole subtree to one state and
/// unchecking a leaf clears every ancestor without touching siblings.
#[cfg_attr(test, test)]
pub(crate) fn test_branch_check_is_uniform() {
	let host = sample_host();
	let tree = CheckTree::default();
	tree.reconcile(host.ids(), &host).unwrap();

	let wall_type = tree.branch_at(&["Model", "Walls", "Basic", "200mm"]).unwrap();
	tree.toggle_check(wall_type, true).unwrap();
	for value in [10, 11, 12] {
		assert!(checked(&tree, tree.leaf(id(value)).unwrap()));
	}
	for path in [&["Model"][..], &["Model", "Walls"], &["Model", "Walls", "Basic"]] {
		let handle = tree.branch_at(path).unwrap();
		assert_eq!(checked(&tree, handle), path.len() > 1, "{path:?}");
	}

	tree.toggle_check(tree.leaf(id(11)).unwrap(), false).unwrap();
	for path in [&["Model"][..], &["Model", "Walls"], &["Model", "Walls", "Basic"], &["Model", "Walls", "Basic", "200mm"]] {
		assert!(!checked(&tree, tree.branch_at(path).unwrap()), "{path:?}");
	}
	assert!(checked(&tree, tree.leaf(id(10)).unwrap()));
	assert!(checked(&tree, tree.leaf(id(12)).unwrap()));
	tree.verify().unwrap();
}

/// Invariant: reconciliation keeps surviving leaves' checked state.
#[cfg_attr(test, test)]
pub(crate) fn test_reconcile_preserves_checked() {
	let host = sample_host();
	let tree = CheckTree::default();
	tree.reconcile([id(10), id(20)], &host).unwrap();
	tree.toggle_check(tree.leaf(id(20)).unwrap(), true).unwrap();

	let report = tree.reconcile([id(20), id(30)], &host).unwrap();
	assert_eq!((report.added, report.removed), (1, 1));
	assert_eq!(tree.leaf(id(10)), None);
	assert!(checked(&tree, tree.leaf(id(20)).unwrap()));
	assert!(!checked(&tree, tree.leaf(id(30)).unwrap()));
	assert_eq!(tree.checked_identifiers().unwrap(), vec![id(20)]);
	tree.verify().unwrap();
}

/// Invariant: a branch that loses its last leaf is removed.
#[cfg_attr(test, test)]
pub(crate) fn test_empty_branches_are_pruned() {
	let host = sample_host();
	let tree = CheckTree::default();
	tree.reconcile(host.ids(), &host).unwrap();
	let annotation = tree.branch_at(&["Annotation"]).unwrap();

	tree.reconcile([id(10), id(11), id(12), id(20)], &host).unwrap();
	assert_eq!(tree.branch_at(&["Annotation"]), None);
	assert_eq!(tree.node(annotation), None);
	assert_eq!(tree.roots().len(), 1);

	tree.reconcile([], &host).unwrap();
	assert!(tree.roots().is_empty());
	assert_eq!(tree.state.lock().arena.len(), 0);
}

/// Invariant: a selection naming an unknown leaf changes nothing.
#[cfg_attr(test, test)]
pub(crate) fn test_stale_selection_is_rejected() {
	let host = sample_host();
	let tree = CheckTree::default();
	tree.reconcile([id(10), id(20)], &host).unwrap();
	tree.toggle_check(tree.leaf(id(10)).unwrap(), true).unwrap();
	let before = tree.outline();

	let stale: FxHashSet<ElementId> = [id(20), id(99)].into_iter().collect();
	assert_eq!(tree.sync_from_external_selection(&stale), Ok(false));
	assert_eq!(tree.outline(), before);
	check_state(&tree.state.lock()).unwrap();
}
