use std::fmt;

use serde::{Deserialize, Serialize};

/// Which identifiers make up the active subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
	/// The host's current selection.
	Selection,
	/// Elements owned by the active view, plus hidden-but-tracked ones.
	View,
	/// Every tracked element.
	#[default]
	Project,
}

impl FilterMode {
	/// Returns true if the subset must be recomputed on every request, because
	/// its source can change without the index being told.
	pub const fn always_refresh(self) -> bool {
		matches!(self, FilterMode::View)
	}
}

impl fmt::Display for FilterMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			FilterMode::Selection => "selection",
			FilterMode::View => "view",
			FilterMode::Project => "project",
		})
	}
}
