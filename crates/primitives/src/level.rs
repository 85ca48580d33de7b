use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of classification levels above the instance level.
pub const LEVEL_COUNT: usize = 4;

/// One depth of the classification hierarchy.
///
/// Levels are ordered from the coarsest grouping to the finest; instances sit
/// below [`Level::ElementType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
	/// Category type (model, annotation, analytical, ...).
	CategoryType,
	/// Category (walls, columns, doors, ...).
	Category,
	/// Family name.
	Family,
	/// Element type name.
	ElementType,
}

impl Level {
	/// All levels in descent order.
	pub const ALL: [Level; LEVEL_COUNT] = [Level::CategoryType, Level::Category, Level::Family, Level::ElementType];

	/// Zero-based depth of this level.
	pub const fn depth(self) -> usize {
		match self {
			Level::CategoryType => 0,
			Level::Category => 1,
			Level::Family => 2,
			Level::ElementType => 3,
		}
	}

	/// Level at the given depth, if any.
	pub const fn from_depth(depth: usize) -> Option<Level> {
		match depth {
			0 => Some(Level::CategoryType),
			1 => Some(Level::Category),
			2 => Some(Level::Family),
			3 => Some(Level::ElementType),
			_ => None,
		}
	}

	/// Next finer level, or `None` at the terminal level.
	pub const fn next(self) -> Option<Level> {
		Level::from_depth(self.depth() + 1)
	}

	/// Returns true for the last level before instances.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Level::ElementType)
	}

	/// Attribute name of this level.
	pub const fn name(self) -> &'static str {
		match self {
			Level::CategoryType => "CategoryType",
			Level::Category => "Category",
			Level::Family => "Family",
			Level::ElementType => "ElementType",
		}
	}

	/// Key used when the host has no value for this level.
	pub const fn missing_key(self) -> &'static str {
		match self {
			Level::CategoryType => "No CategoryType",
			Level::Category => "No Category",
			Level::Family => "No Family",
			Level::ElementType => "No ElementType",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The four classification keys of one element, coarsest first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassificationPath {
	keys: [String; LEVEL_COUNT],
}

impl ClassificationPath {
	/// Builds a path from optional attribute values, substituting
	/// [`Level::missing_key`] for absent ones.
	pub fn from_options(
		category_type: Option<String>,
		category: Option<String>,
		family: Option<String>,
		element_type: Option<String>,
	) -> Self {
		let pick = |value: Option<String>, level: Level| value.unwrap_or_else(|| level.missing_key().to_string());
		Self {
			keys: [
				pick(category_type, Level::CategoryType),
				pick(category, Level::Category),
				pick(family, Level::Family),
				pick(element_type, Level::ElementType),
			],
		}
	}

	/// Builds a path from four present values.
	pub fn new(
		category_type: impl Into<String>,
		category: impl Into<String>,
		family: impl Into<String>,
		element_type: impl Into<String>,
	) -> Self {
		Self {
			keys: [category_type.into(), category.into(), family.into(), element_type.into()],
		}
	}

	/// Key at the given level.
	pub fn key(&self, level: Level) -> &str {
		&self.keys[level.depth()]
	}

	/// Keys in descent order.
	pub fn keys(&self) -> &[String; LEVEL_COUNT] {
		&self.keys
	}

	/// Iterates `(level, key)` pairs in descent order.
	pub fn iter(&self) -> impl Iterator<Item = (Level, &str)> {
		Level::ALL.into_iter().zip(self.keys.iter().map(String::as_str))
	}
}

impl Default for ClassificationPath {
	fn default() -> Self {
		Self::from_options(None, None, None, None)
	}
}
