use strata_primitives::{ClassificationPath, ElementId, MemoryHost, NodeDescriptor};

pub(crate) fn id(value: i64) -> ElementId {
	ElementId(value)
}

pub(crate) fn desc(value: i64, owner: Option<i64>, keys: [&str; 4]) -> NodeDescriptor<ElementId> {
	let [category_type, category, family, element_type] = keys;
	NodeDescriptor::new(
		ElementId(value),
		owner.map(ElementId),
		ClassificationPath::new(category_type, category, family, element_type),
	)
}

/// Three elements: walls 1 and 2 under "Arch", column 3 under "Struct".
/// Elements 1 and 3 are owned by view 100.
pub(crate) fn sample_host() -> MemoryHost<ElementId> {
	let mut host = MemoryHost::new();
	host.insert(desc(1, Some(100), ["Arch", "Walls", "Basic", "200mm"]));
	host.insert(desc(2, None, ["Arch", "Walls", "Basic", "300mm"]));
	host.insert(desc(3, Some(100), ["Struct", "Columns", "Steel", "W10"]));
	host
}
