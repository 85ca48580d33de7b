use std::fmt;

use strata_primitives::Identifier;

use crate::arena::NodeId;

/// What an [`OutlineRow`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<I> {
	Branch,
	Leaf(I),
}

/// One pre-order row of [`crate::CheckTree::outline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow<I: Identifier> {
	/// Zero for root branches.
	pub depth: usize,
	pub handle: NodeId,
	pub kind: RowKind<I>,
	/// Counter label for branches, identifier for leaves.
	pub label: String,
	pub checked: bool,
	/// Always false for leaves.
	pub expanded: bool,
}

impl<I: Identifier> fmt::Display for OutlineRow<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mark = if self.checked { "[x]" } else { "[ ]" };
		let fold = match self.kind {
			RowKind::Branch if self.expanded => "- ",
			RowKind::Branch => "+ ",
			RowKind::Leaf(_) => "",
		};
		write!(f, "{:indent$}{fold}{mark} {}", "", self.label, indent = self.depth * 2)
	}
}
