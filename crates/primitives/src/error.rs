/// Failure to resolve an identifier through the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// The host has no element for this identifier.
	#[error("element {id} not found")]
	NotFound { id: String },

	/// The host could not answer right now (document closing, transaction open, ...).
	#[error("host unavailable: {reason}")]
	Unavailable { reason: String },
}

impl ResolveError {
	/// Shorthand for [`ResolveError::NotFound`] from any displayable identifier.
	pub fn not_found(id: impl std::fmt::Display) -> Self {
		Self::NotFound { id: id.to_string() }
	}
}
