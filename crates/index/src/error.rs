/// Errors raised by index queries and removals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
	/// A path token named neither a child group nor a member at that depth.
	#[error("no group or element named {token:?} at depth {depth}")]
	NotFound { token: String, depth: usize },

	/// A tracked element's recorded path has no live branch in the tree.
	///
	/// Unreachable while the index invariants hold; the operation is aborted
	/// before anything is mutated.
	#[error("element {id} has no live branch at {at:?}: {detail}")]
	Inconsistent { id: String, at: Vec<String>, detail: &'static str },

	/// [`crate::ClassificationIndex::verify`] found a broken invariant.
	#[error("invariant violated: {0}")]
	InvariantViolated(String),
}
