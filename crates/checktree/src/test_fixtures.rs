use strata_primitives::{ClassificationPath, ElementId, MemoryHost, NodeDescriptor};

pub(crate) fn id(value: i64) -> ElementId {
	ElementId(value)
}

pub(crate) fn host_with(rows: &[(i64, [&str; 4])]) -> MemoryHost<ElementId> {
	let mut host = MemoryHost::new();
	for (value, [category_type, category, family, element_type]) in rows {
		host.insert(NodeDescriptor::new(
			ElementId(*value),
			None,
			ClassificationPath::new(*category_type, *category, *family, *element_type),
		));
	}
	host
}

/// Walls 10, 11 and 12 share one element type; 20 and 30 sit in other
/// categories.
pub(crate) fn sample_host() -> MemoryHost<ElementId> {
	host_with(&[
		(10, ["Model", "Walls", "Basic", "200mm"]),
		(11, ["Model", "Walls", "Basic", "200mm"]),
		(12, ["Model", "Walls", "Basic", "200mm"]),
		(20, ["Model", "Doors", "Single", "900mm"]),
		(30, ["Annotation", "Tags", "Door Tag", "Standard"]),
	])
}
