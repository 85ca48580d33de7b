use crate::arena::NodeId;

/// Errors raised by checkbox tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
	/// The handle names no live node.
	#[error("no live node {0}")]
	UnknownNode(NodeId),

	/// The handle names a leaf where a branch is required.
	#[error("node {0} is a leaf, not a branch")]
	NotABranch(NodeId),

	/// Parent links, child maps or the leaf index disagree.
	///
	/// The operation that found it is aborted before mutating anything.
	#[error("checkbox tree inconsistent: {detail}")]
	Inconsistent { detail: String },

	/// No consistent checked snapshot could be taken in the allowed attempts.
	#[error("checked snapshot unavailable after {attempts} attempts")]
	SnapshotUnavailable { attempts: u32 },

	/// [`crate::CheckTree::verify`] found a broken invariant.
	#[error("invariant violated: {0}")]
	InvariantViolated(String),
}

impl TreeError {
	pub(crate) fn inconsistent(detail: impl Into<String>) -> Self {
		Self::Inconsistent { detail: detail.into() }
	}
}
