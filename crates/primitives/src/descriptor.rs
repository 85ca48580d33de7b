use std::collections::BTreeMap;

use crate::ids::Identifier;
use crate::level::{ClassificationPath, Level};

/// Classification record for one tracked identifier.
///
/// Keys are fixed for as long as the identifier stays tracked; reclassifying an
/// element means removing it and adding it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor<I> {
	id: I,
	owner_context: Option<I>,
	path: ClassificationPath,
}

impl<I: Identifier> NodeDescriptor<I> {
	/// Creates a descriptor from a resolved classification path.
	pub fn new(id: I, owner_context: Option<I>, path: ClassificationPath) -> Self {
		Self { id, owner_context, path }
	}

	/// The identifier this descriptor classifies.
	pub fn id(&self) -> I {
		self.id
	}

	/// Owning context (e.g. owner view), if the element has one.
	pub fn owner_context(&self) -> Option<I> {
		self.owner_context
	}

	/// Classification key at `level`.
	pub fn key(&self, level: Level) -> &str {
		self.path.key(level)
	}

	/// All classification keys.
	pub fn path(&self) -> &ClassificationPath {
		&self.path
	}
}

/// Buckets descriptors by their key at `level`, in lexicographic key order.
///
/// Descriptors keep their batch order within a bucket.
pub fn group_by_level<'a, I: Identifier>(
	batch: &[&'a NodeDescriptor<I>],
	level: Level,
) -> BTreeMap<&'a str, Vec<&'a NodeDescriptor<I>>> {
	let mut grouping: BTreeMap<&'a str, Vec<&'a NodeDescriptor<I>>> = BTreeMap::new();
	for &desc in batch {
		grouping.entry(desc.key(level)).or_default().push(desc);
	}
	grouping
}
