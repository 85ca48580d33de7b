//! Session configuration loaded from TOML.

use std::time::Duration;

use serde::Deserialize;
use strata_checktree::TreeOptions;
use strata_index::{HiddenUnionPolicy, IndexOptions};
use strata_primitives::FilterMode;

use crate::error::SessionError;

/// Tunables for a [`crate::FilterSession`].
///
/// Every key is optional:
///
/// ```toml
/// default_mode = "view"
/// hidden_union = "forced-refresh-only"
/// snapshot_attempts = 5
/// snapshot_wait_ms = 10
/// auto_expand = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
	/// Mode used by [`crate::FilterSession::refresh_current`] before any
	/// mode has been chosen.
	#[serde(default)]
	pub default_mode: FilterMode,
	/// Whether View mode unions in hidden-but-tracked elements on every
	/// recomputation or only on forced ones.
	#[serde(default)]
	pub hidden_union: HiddenUnionPolicy,
	/// Attempts at a consistent checked snapshot before giving up.
	#[serde(default = "default_snapshot_attempts")]
	pub snapshot_attempts: u32,
	/// Pause before retrying a torn snapshot, in milliseconds.
	#[serde(default = "default_snapshot_wait_ms")]
	pub snapshot_wait_ms: u64,
	/// Expand every branch a reconciliation touches.
	#[serde(default = "default_auto_expand")]
	pub auto_expand: bool,
}

fn default_snapshot_attempts() -> u32 {
	5
}

fn default_snapshot_wait_ms() -> u64 {
	10
}

fn default_auto_expand() -> bool {
	true
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			default_mode: FilterMode::default(),
			hidden_union: HiddenUnionPolicy::default(),
			snapshot_attempts: default_snapshot_attempts(),
			snapshot_wait_ms: default_snapshot_wait_ms(),
			auto_expand: default_auto_expand(),
		}
	}
}

impl SessionConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, SessionError> {
		let config: SessionConfig = toml::from_str(source).map_err(|err| SessionError::Config(err.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), SessionError> {
		if self.snapshot_attempts == 0 {
			return Err(SessionError::Config("snapshot_attempts must be at least 1".into()));
		}
		Ok(())
	}

	pub fn index_options(&self) -> IndexOptions {
		IndexOptions {
			hidden_union: self.hidden_union,
		}
	}

	pub fn tree_options(&self) -> TreeOptions {
		TreeOptions {
			auto_expand: self.auto_expand,
			snapshot_attempts: self.snapshot_attempts,
			snapshot_wait: Duration::from_millis(self.snapshot_wait_ms),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = SessionConfig::from_toml_str("").unwrap();
		assert_eq!(config, SessionConfig::default());
		assert_eq!(config.hidden_union, HiddenUnionPolicy::Always);
		assert_eq!(config.default_mode, FilterMode::Project);
		assert_eq!(config.tree_options(), TreeOptions::default());
	}

	#[test]
	fn parses_every_key() {
		const CONFIG: &str = r#"
			default_mode = "view"
			hidden_union = "forced-refresh-only"
			snapshot_attempts = 3
			snapshot_wait_ms = 25
			auto_expand = false
		"#;
		let config = SessionConfig::from_toml_str(CONFIG).unwrap();
		assert_eq!(config.default_mode, FilterMode::View);
		assert_eq!(config.index_options().hidden_union, HiddenUnionPolicy::ForcedRefreshOnly);
		assert_eq!(
			config.tree_options(),
			TreeOptions {
				auto_expand: false,
				snapshot_attempts: 3,
				snapshot_wait: Duration::from_millis(25),
			}
		);
	}

	#[test]
	fn rejects_bad_values() {
		assert!(matches!(
			SessionConfig::from_toml_str("hidden_union = \"sometimes\""),
			Err(SessionError::Config(_))
		));
		assert!(matches!(
			SessionConfig::from_toml_str("snapshot_attempts = 0"),
			Err(SessionError::Config(_))
		));
		assert!(matches!(
			SessionConfig::from_toml_str("snapshot_retries = 2"),
			Err(SessionError::Config(_))
		));
	}
}
