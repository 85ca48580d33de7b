//! End-to-end session flows against an in-memory host.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashSet;
use strata_checktree::TreeError;
use strata_index::IndexError;
use strata_primitives::{ClassificationPath, ElementId, FilterMode, MemoryHost, NodeDescriptor};
use strata_session::{FilterSession, SessionConfig, SessionError};

const VIEW: ElementId = ElementId(100);

fn init() {
	let _ = tracing_subscriber::fmt::try_init();
}

fn element(id: i64, owner: Option<ElementId>, keys: [&str; 4]) -> NodeDescriptor<ElementId> {
	let [category_type, category, family, element_type] = keys;
	NodeDescriptor::new(
		ElementId(id),
		owner,
		ClassificationPath::new(category_type, category, family, element_type),
	)
}

/// Two walls and a door in the view, a column outside it.
fn document() -> MemoryHost<ElementId> {
	let mut host = MemoryHost::new();
	host.insert(element(1, Some(VIEW), ["Model", "Walls", "Basic Wall", "200mm"]));
	host.insert(element(2, Some(VIEW), ["Model", "Walls", "Basic Wall", "300mm"]));
	host.insert(element(3, Some(VIEW), ["Model", "Doors", "Single-Flush", "0915 x 2134mm"]));
	host.insert(element(4, None, ["Model", "Structural Columns", "W-Wide Flange", "W10X33"]));
	host.set_view(Some(VIEW));
	host
}

fn set(values: &[i64]) -> FxHashSet<ElementId> {
	values.iter().copied().map(ElementId).collect()
}

#[test]
fn project_refresh_mirrors_every_element() {
	init();
	let host = document();
	let session = FilterSession::default();
	session.set_all_elements(host.ids(), &host);

	let report = session.refresh(FilterMode::Project, false, &host).unwrap();
	assert!(report.recomputed);
	assert_eq!(report.subset_len, 4);
	assert_eq!(report.reconcile.added, 4);
	assert_eq!(report.summary.to_string(), "Total Selected Items: 0 / 4");
	assert_eq!(session.tree().leaf_ids(), host.ids());
}

#[test]
fn switching_modes_reconciles_the_tree() {
	init();
	let mut host = document();
	host.set_selection([ElementId(4)]);
	let session = FilterSession::default();
	session.set_all_elements(host.ids(), &host);

	session.refresh(FilterMode::View, false, &host).unwrap();
	assert_eq!(session.tree().leaf_ids(), vec![ElementId(1), ElementId(2), ElementId(3)]);
	session
		.tree()
		.toggle_check(session.tree().branch_at(&["Model", "Walls"]).unwrap(), true)
		.unwrap();

	let report = session.refresh(FilterMode::Selection, false, &host).unwrap();
	assert_eq!((report.reconcile.added, report.reconcile.removed), (1, 3));
	assert_eq!(session.tree().leaf_ids(), vec![ElementId(4)]);
	assert!(session.checked_identifiers().unwrap().is_empty());
}

#[test]
fn checks_survive_a_refresh_of_the_same_mode() {
	init();
	let mut host = document();
	let session = FilterSession::default();
	session.set_all_elements(host.ids(), &host);
	session.refresh(FilterMode::View, false, &host).unwrap();
	session
		.tree()
		.toggle_check(session.tree().leaf(ElementId(3)).unwrap(), true)
		.unwrap();

	host.insert(element(5, Some(VIEW), ["Model", "Doors", "Single-Flush", "0915 x 2134mm"]));
	session.add_elements([ElementId(5)], &host);
	let report = session.refresh(FilterMode::View, false, &host).unwrap();
	assert!(report.recomputed);
	assert_eq!(report.reconcile.added, 1);
	assert_eq!(session.checked_identifiers().unwrap(), vec![ElementId(3)]);

	let doors = session.tree().branch_at(&["Model", "Doors"]).unwrap();
	let doors = session.tree().node(doors).unwrap();
	assert_eq!(doors.as_branch().unwrap().counter_label(), "[ 1/2 ] Doors");
}

#[test]
fn hidden_elements_stay_in_view_under_default_policy() {
	init();
	let mut host = document();
	host.hidden_mut().mark_hidden(VIEW, [ElementId(4)]);
	let session = FilterSession::default();
	session.set_all_elements(host.ids(), &host);

	session.refresh(FilterMode::View, false, &host).unwrap();
	assert!(session.tree().leaf(ElementId(4)).is_some());

	host.hidden_mut().unmark_hidden(VIEW, [ElementId(4)]);
	session.refresh(FilterMode::View, false, &host).unwrap();
	assert_eq!(session.tree().leaf(ElementId(4)), None);
}

#[test]
fn forced_refresh_only_policy_from_config() {
	init();
	let mut host = document();
	host.hidden_mut().mark_hidden(VIEW, [ElementId(4)]);
	let session = FilterSession::from_toml_str("hidden_union = \"forced-refresh-only\"").unwrap();
	session.set_all_elements(host.ids(), &host);

	session.refresh(FilterMode::View, false, &host).unwrap();
	assert_eq!(session.tree().leaf(ElementId(4)), None);
	session.refresh(FilterMode::View, true, &host).unwrap();
	assert!(session.tree().leaf(ElementId(4)).is_some());
}

#[test]
fn refresh_current_starts_from_configured_mode() {
	init();
	let host = document();
	let session = FilterSession::from_toml_str("default_mode = \"view\"").unwrap();
	session.set_all_elements(host.ids(), &host);

	let report = session.refresh_current(false, &host).unwrap();
	assert_eq!(report.mode, FilterMode::View);
	assert_eq!(report.subset_len, 3);

	session.refresh(FilterMode::Project, false, &host).unwrap();
	assert_eq!(session.refresh_current(false, &host).unwrap().mode, FilterMode::Project);
}

#[test]
fn sync_selection_checks_host_selection() {
	init();
	let mut host = document();
	let session = FilterSession::default();
	session.set_all_elements(host.ids(), &host);
	session.refresh(FilterMode::View, false, &host).unwrap();

	host.set_selection([ElementId(1), ElementId(3)]);
	assert_eq!(session.sync_selection(&host), Ok(true));
	assert_eq!(session.checked_identifiers().unwrap(), vec![ElementId(1), ElementId(3)]);
	assert!(!session.did_selection_change(&set(&[1, 3])));

	// Element 4 is outside the view, so the tree cannot show it checked.
	host.set_selection([ElementId(1), ElementId(4)]);
	assert_eq!(session.sync_selection(&host), Ok(false));
	assert_eq!(session.checked_identifiers().unwrap(), vec![ElementId(1), ElementId(3)]);
}

#[test]
fn change_detection() {
	let session = FilterSession::<ElementId>::default();
	assert!(session.update_all_elements([ElementId(1), ElementId(2)]));
	assert!(!session.update_all_elements([ElementId(1), ElementId(2)]));
	// Order matters for the element universe.
	assert!(session.update_all_elements([ElementId(2), ElementId(1)]));

	assert!(session.did_selection_change(&set(&[1, 2])));
	assert!(!session.did_selection_change(&set(&[2, 1])));
	assert!(session.did_selection_change(&set(&[])));
}

#[test]
fn selected_elements_change_only_when_they_grow() {
	let session = FilterSession::<ElementId>::default();
	assert!(!session.update_selected_elements([]));
	assert!(session.update_selected_elements([ElementId(1), ElementId(2)]));
	assert!(!session.update_selected_elements([ElementId(2), ElementId(1)]));
	assert!(!session.update_selected_elements([ElementId(1)]));
	assert_eq!(session.selected_elements(), vec![ElementId(1), ElementId(2)]);

	assert!(session.update_selected_elements([ElementId(3)]));
	assert_eq!(session.selected_elements(), vec![ElementId(3)]);
}

#[test]
fn batch_changes_recompute_the_same_mode() {
	init();
	let mut host = document();
	let session = FilterSession::default();
	session.add_elements([ElementId(1), ElementId(2)], &host);
	session.refresh(FilterMode::Project, false, &host).unwrap();

	let idle = session.refresh(FilterMode::Project, false, &host).unwrap();
	assert!(!idle.recomputed);

	host.insert(element(5, None, ["Model", "Walls", "Basic Wall", "300mm"]));
	session.add_elements([ElementId(5)], &host);
	let report = session.refresh(FilterMode::Project, false, &host).unwrap();
	assert!(report.recomputed);
	assert_eq!(report.reconcile.added, 1);
	assert_eq!(session.tree().leaf_ids(), vec![ElementId(1), ElementId(2), ElementId(5)]);

	session.remove_elements([ElementId(1)]).unwrap();
	let report = session.refresh(FilterMode::Project, false, &host).unwrap();
	assert!(report.recomputed);
	assert_eq!(session.tree().leaf_ids(), vec![ElementId(2), ElementId(5)]);

	session.remove_elements([ElementId(404)]).unwrap();
	assert!(!session.refresh(FilterMode::Project, false, &host).unwrap().recomputed);

	session.clear_elements();
	assert!(session.refresh(FilterMode::Project, false, &host).unwrap().recomputed);
	assert!(session.tree().is_empty());
}

#[test]
fn element_batches_forward_to_the_index() {
	init();
	let host = document();
	let session = FilterSession::default();

	let report = session.add_elements([ElementId(1), ElementId(9)], &host);
	assert_eq!(report.applied, 1);
	assert_eq!(report.unresolved.len(), 1);

	session.set_all_elements([ElementId(2), ElementId(3)], &host);
	assert!(!session.index().contains(ElementId(1)));
	assert_eq!(session.index().len(), 2);

	assert_eq!(session.remove_elements([ElementId(2)]).unwrap().applied, 1);
	assert_eq!(
		session.index().get_by_path(&["Model", "Walls"]),
		Err(IndexError::NotFound {
			token: "Walls".into(),
			depth: 1,
		})
	);

	session.clear_elements();
	assert!(session.index().is_empty());
}

#[test]
fn movement_settings_validate_arity() {
	let session = FilterSession::<ElementId>::default();
	session.set_copy_and_shift(true);
	session.set_displacement(&[10, 0, -5]).unwrap();
	assert_eq!(
		session.set_displacement(&[1]),
		Err(SessionError::MalformedInput { expected: 3, actual: 1 })
	);
	let settings = session.move_settings();
	assert!(settings.copy_and_shift);
	assert_eq!(settings.displacement(), [10, 0, -5]);
}

#[test]
fn config_errors_surface_as_session_errors() {
	assert!(matches!(
		FilterSession::<ElementId>::from_toml_str("snapshot_attempts = \"many\""),
		Err(SessionError::Config(_))
	));
	let tree_error: SessionError = TreeError::SnapshotUnavailable { attempts: 5 }.into();
	assert_eq!(tree_error.to_string(), "checked snapshot unavailable after 5 attempts");
	assert_eq!(SessionConfig::default().snapshot_attempts, 5);
}

proptest! {
	#[test]
	fn project_subset_tracks_index_after_any_batches(
		batches in prop::collection::vec((any::<bool>(), prop::collection::vec(1i64..6, 0..5)), 0..20)
	) {
		let host = document();
		let session = FilterSession::default();
		for (add, ids) in batches {
			let ids: Vec<ElementId> = ids.into_iter().map(ElementId).collect();
			if add {
				session.add_elements(ids, &host);
			} else {
				session.remove_elements(ids).unwrap();
			}
			session.refresh(FilterMode::Project, false, &host).unwrap();
			let mut tracked: Vec<ElementId> = session.index().get_by_path::<&str>(&[]).unwrap().into_iter().collect();
			tracked.sort_unstable();
			prop_assert_eq!(session.tree().leaf_ids(), tracked);
			prop_assert!(session.index().verify().is_ok());
			prop_assert!(session.tree().verify().is_ok());
		}
	}
}
