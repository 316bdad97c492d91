//! Export engine: assembling registry pages into a single PDF.

pub mod images;
pub mod merger;

pub use merger::{ExportBundle, MergeStatistics, Merger};
