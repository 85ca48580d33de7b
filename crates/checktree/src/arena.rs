//! Slab-backed node storage with generational handles.

use std::fmt;

use slab::Slab;

/// Handle to a node in a [`crate::CheckTree`].
///
/// Handles stay valid until their node is removed. A handle whose slot was
/// freed and reused reads as absent rather than aliasing the new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: usize,
	generation: u64,
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}v{}", self.index, self.generation)
	}
}

struct Slot<T> {
	generation: u64,
	value: T,
}

pub(crate) struct Arena<T> {
	slots: Slab<Slot<T>>,
	generation: u64,
}

impl<T> Default for Arena<T> {
	fn default() -> Self {
		Self {
			slots: Slab::new(),
			generation: 0,
		}
	}
}

impl<T> Arena<T> {
	pub(crate) fn insert(&mut self, value: T) -> NodeId {
		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;
		let index = self.slots.insert(Slot { generation, value });
		NodeId { index, generation }
	}

	pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
		self.slots
			.get(id.index)
			.filter(|slot| slot.generation == id.generation)
			.map(|slot| &slot.value)
	}

	pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
		self.slots
			.get_mut(id.index)
			.filter(|slot| slot.generation == id.generation)
			.map(|slot| &mut slot.value)
	}

	pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
		self.get(id)?;
		Some(self.slots.remove(id.index).value)
	}

	pub(crate) fn contains(&self, id: NodeId) -> bool {
		self.get(id).is_some()
	}

	pub(crate) fn len(&self) -> usize {
		self.slots.len()
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
		self.slots.iter().map(|(index, slot)| {
			(
				NodeId {
					index,
					generation: slot.generation,
				},
				&slot.value,
			)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reused_slot_rejects_stale_handle() {
		let mut arena = Arena::default();
		let first = arena.insert("a");
		assert_eq!(arena.remove(first), Some("a"));

		let second = arena.insert("b");
		assert_eq!(first.index, second.index);
		assert_eq!(arena.get(first), None);
		assert_eq!(arena.get(second), Some(&"b"));
		assert_eq!(arena.remove(first), None);
		assert_eq!(arena.len(), 1);
	}
}
