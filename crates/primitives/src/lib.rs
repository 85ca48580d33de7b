//! Core types for element classification: identifiers, descriptors, levels, modes,
//! and the contracts a host application implements to feed them.

/// Classification descriptors attached to tracked identifiers.
pub mod descriptor;
/// Resolution errors surfaced by host collaborators.
pub mod error;
/// Per-context registry of hidden-but-tracked identifiers.
pub mod hidden;
/// Host collaborator contracts.
pub mod host;
/// Identifier trait and the default element identifier.
pub mod ids;
/// Classification levels and paths.
pub mod level;
/// Subset filter modes.
pub mod mode;

pub use descriptor::{NodeDescriptor, group_by_level};
pub use error::ResolveError;
pub use hidden::HiddenTracker;
pub use host::{DescriptorSource, HostContext, MemoryHost};
pub use ids::{ElementId, Identifier};
pub use level::{ClassificationPath, LEVEL_COUNT, Level};
pub use mode::FilterMode;
