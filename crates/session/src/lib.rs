//! Host-facing facade over the classification index and checkbox tree.
//!
//! A [`FilterSession`] owns one [`strata_index::ClassificationIndex`] and one
//! [`strata_checktree::CheckTree`]. The host feeds it element batches and
//! filter-mode changes; the session keeps the tree showing exactly the
//! active subset.

mod config;
mod error;
mod movement;
mod report;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use movement::{DISPLACEMENT_AXES, MoveSettings};
pub use report::RefreshReport;
pub use session::FilterSession;
