//! pagedeck - Assemble pages from PDFs and images into a single document.
//!
//! This library ingests mixed PDF and image inputs, keeps the resulting
//! pages in an ordered, rearrangeable sequence, and exports them as one
//! merged PDF. It supports:
//!
//! - PDF and raster image ingestion with per-file error classification
//! - A page registry with stable ids, reordering, and deletion
//! - Single-parse export: each source document is loaded exactly once
//! - Image pages embedded at their natural print size
//! - Comprehensive error handling
//!
//! # Examples
//!
//! ## Ingest and export
//!
//! ```no_run
//! use pagedeck::config::IngestOptions;
//! use pagedeck::ingest::Ingestor;
//! use pagedeck::merge::Merger;
//! use pagedeck::session::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let ingestor = Ingestor::new(IngestOptions::default());
//!
//! let bytes = std::fs::read("scan.pdf")?;
//! ingestor
//!     .ingest_file(&mut session, "scan.pdf", bytes, None, |_, _| {})
//!     .await?;
//!
//! // Move the last page to the front
//! let last = session.snapshot().len() - 1;
//! session.apply_drag(last, 0);
//!
//! let bundle = Merger::new().export(&session, "out.pdf")?;
//! std::fs::write(&bundle.file_name, &bundle.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod io;
pub mod merge;
pub mod output;
pub mod registry;
pub mod render;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PageDeckError, Result};
pub use registry::{Page, PageId, Registry, SourceId};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
