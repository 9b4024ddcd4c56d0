//! NuCLS dataset organiser
//!
//! This library converts an annotated cell dataset (images, label masks and
//! per-image annotation tables) into per-cell-type crops for object detection
//! and semantic segmentation training, and renames raw slide exports to the
//! identifiers used by the metadata table.

pub mod config;
pub mod counts;
pub mod crop;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod io;
pub mod raster;
pub mod rename;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, RenameArgs};
pub use counts::CountsTable;
pub use dataset::{process_dataset, OrganizeSummary};
pub use error::{CoordinateError, OrganizeError};
pub use rename::{rename_slides, RenameStats};
pub use types::{CellType, ProcessingStats, Task};
