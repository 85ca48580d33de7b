use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Opaque token naming one trackable element for the lifetime of a session.
///
/// Identifiers are supplied by the host and never generated here. The
/// `Display` form is what path queries match against when a path token does
/// not name a classification key.
pub trait Identifier: Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> Identifier for T where T: Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// Integer element identifier, the shape most CAD hosts hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub i64);

impl ElementId {
	/// Sentinel used by hosts for "no element" (e.g. an element owned by no view).
	pub const INVALID: Self = Self(-1);

	/// Returns the raw integer value.
	pub fn value(self) -> i64 {
		self.0
	}

	/// Returns true unless this is [`ElementId::INVALID`].
	pub fn is_valid(self) -> bool {
		self != Self::INVALID
	}
}

impl From<i64> for ElementId {
	fn from(value: i64) -> Self {
		Self(value)
	}
}

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ElementId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim().parse().map(Self)
	}
}
