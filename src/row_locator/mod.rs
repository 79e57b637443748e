//! Row location for list-of-people screenshots
//!
//! Icon buttons (follow, following, message) mark every row of the list.
//! Their match positions are clustered into one reference point per row, and
//! a flatness probe next to each reference point decides where the row's
//! username label sits.

pub mod cluster;
pub mod config;
pub mod pipeline;
pub mod reference;
pub mod uniformity;


// Re-export main types and functions
pub use cluster::group_averages;
pub use config::{LabelRects, LocatorConfig};
pub use pipeline::{LabelChoice, LocatedRow, RowLocator};
pub use reference::resolve_reference_points;
pub use uniformity::is_uniform;
