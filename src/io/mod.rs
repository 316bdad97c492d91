//! File input/output operations.

pub mod writer;

pub use writer::{OutputWriter, WriteOptions, WriteStatistics};
