use std::time::Duration;

/// Tunables for a [`crate::CheckTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
	/// Expand every branch a reconciliation touches.
	pub auto_expand: bool,
	/// Attempts [`crate::CheckTree::checked_identifiers`] makes before giving up.
	pub snapshot_attempts: u32,
	/// Pause before retrying a snapshot that disagreed with the counters.
	pub snapshot_wait: Duration,
}

impl Default for TreeOptions {
	fn default() -> Self {
		Self {
			auto_expand: true,
			snapshot_attempts: 5,
			snapshot_wait: Duration::from_millis(10),
		}
	}
}
