//! Active subset computation for each [`FilterMode`].

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use strata_primitives::{FilterMode, HostContext, Identifier};

/// When View mode unions in hidden-but-tracked identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HiddenUnionPolicy {
	/// On every View computation, including after switching away and back.
	#[default]
	Always,
	/// Only when the mode change was forced.
	ForcedRefreshOnly,
}

impl HiddenUnionPolicy {
	pub(crate) fn applies(self, forced: bool) -> bool {
		match self {
			HiddenUnionPolicy::Always => true,
			HiddenUnionPolicy::ForcedRefreshOnly => forced,
		}
	}
}

/// Tunables for a [`crate::ClassificationIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
	pub hidden_union: HiddenUnionPolicy,
}

/// Inputs the subset computation reads from the index.
pub(crate) struct SubsetSources<'a, I: Identifier> {
	pub(crate) all: &'a FxHashSet<I>,
	pub(crate) by_owner: &'a FxHashMap<I, FxHashSet<I>>,
}

pub(crate) fn compute<I: Identifier>(
	mode: FilterMode,
	forced: bool,
	sources: SubsetSources<'_, I>,
	host: &impl HostContext<I>,
	policy: HiddenUnionPolicy,
) -> FxHashSet<I> {
	match mode {
		FilterMode::Project => sources.all.clone(),
		FilterMode::Selection => host.current_selection(),
		FilterMode::View => {
			let Some(view) = host.current_view() else {
				return FxHashSet::default();
			};
			let mut subset = sources.by_owner.get(&view).cloned().unwrap_or_default();
			if policy.applies(forced) {
				subset.extend(host.hidden_tracked(view));
			}
			subset
		}
	}
}
