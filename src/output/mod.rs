//! Output formatting and display for pagedeck.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Transient progress lines
//! - Error and warning display
//! - Page listings and summary reports
//! - Quiet and verbose modes

pub mod progress;

pub use progress::ProgressLine;

use std::io::{self, IsTerminal, Write};

use serde::Serialize;

use crate::config::Config;
use crate::ingest::IngestReport;
use crate::merge::MergeStatistics;
use crate::registry::PageKind;
use crate::session::Session;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Debug details, shown only in verbose mode.
    Debug,
    /// Normal informational output.
    Info,
    /// Operation completed successfully.
    Success,
    /// Something worth attention but not fatal.
    Warning,
    /// A failure.
    Error,
}

/// Formats and routes user-facing messages.
///
/// Info and success go to stdout, warnings and errors to stderr. Quiet
/// mode drops everything below warning; verbose mode enables debug lines.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    color: bool,
}

impl OutputFormatter {
    /// Create a formatter with explicit settings.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            color: io::stdout().is_terminal(),
        }
    }

    /// Create an output formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Whether debug output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print an informational message.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    /// Print a warning to stderr.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Print an error to stderr.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Print a debug message (verbose mode only).
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message);
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Debug if !self.verbose => return,
            MessageLevel::Debug | MessageLevel::Info | MessageLevel::Success if self.quiet => {
                return;
            }
            _ => {}
        }

        let (prefix, code) = match level {
            MessageLevel::Debug => ("[debug] ", "\x1b[2m"),
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("", "\x1b[32m"),
            MessageLevel::Warning => ("Warning: ", "\x1b[33m"),
            MessageLevel::Error => ("Error: ", "\x1b[31m"),
        };

        let line = if self.color && !code.is_empty() {
            format!("{code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        };

        match level {
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}

/// One row of a page listing.
#[derive(Debug, Serialize)]
struct PageRow {
    /// 1-based position in the output sequence.
    position: usize,
    /// Stable page id.
    id: u64,
    /// Originating file name.
    source: String,
    /// 1-based page number within the source.
    page: usize,
    /// "document" or "image".
    kind: &'static str,
}

/// Display the assembled page sequence, as a table or as JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn display_page_listing(
    formatter: &OutputFormatter,
    session: &Session,
    json: bool,
) -> crate::Result<()> {
    let rows: Vec<PageRow> = session
        .snapshot()
        .iter()
        .enumerate()
        .map(|(index, page)| PageRow {
            position: index + 1,
            id: page.id,
            source: page.source_name.clone(),
            page: page.original_ordinal,
            kind: match page.kind {
                PageKind::Document { .. } => "document",
                PageKind::Image => "image",
            },
        })
        .collect();

    if json {
        let rendered = serde_json::to_string_pretty(&rows)
            .map_err(|err| crate::PageDeckError::serialization_failure(err.to_string()))?;
        println!("{rendered}");
        let _ = io::stdout().flush();
        return Ok(());
    }

    formatter.info(&format!("{} page(s):", rows.len()));
    for row in &rows {
        formatter.info(&format!(
            "  {:>3}. {} (page {}, {})",
            row.position, row.source, row.page, row.kind
        ));
    }
    Ok(())
}

/// Display ingest statistics to the user.
pub fn display_ingest_report(formatter: &OutputFormatter, report: &IngestReport) {
    formatter.info(&format!(
        "Ingested {} file(s) in {:.2}s: {} pages, {}",
        report.files.len(),
        report.total_time.as_secs_f64(),
        report.total_pages,
        crate::utils::format_file_size(report.total_size)
    ));
}

/// Display export statistics to the user.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.success(&format!(
        "Assembled {} page(s) ({} from documents, {} from images) in {:.2}s: {}",
        stats.total_pages,
        stats.document_pages,
        stats.image_pages,
        stats.merge_time.as_secs_f64(),
        stats.format_output_size()
    ));
}
