use strata_checktree::TreeError;
use strata_index::IndexError;

/// Errors surfaced by a [`crate::FilterSession`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
	/// Index query or removal failed.
	#[error("{0}")]
	Index(#[from] IndexError),

	/// Checkbox tree operation failed.
	#[error("{0}")]
	Tree(#[from] TreeError),

	/// A boundary argument had the wrong number of components.
	#[error("expected {expected} components, got {actual}")]
	MalformedInput { expected: usize, actual: usize },

	/// Session configuration could not be parsed or is out of range.
	#[error("invalid session config: {0}")]
	Config(String),
}
