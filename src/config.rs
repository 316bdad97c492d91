//! Configuration module for pagedeck.
//!
//! This module transforms CLI arguments into a validated, normalized configuration
//! that drives the page assembly process. It handles:
//! - Validation of argument combinations
//! - Resolution of conflicting options
//! - Application of defaults
//! - Output name normalization

use anyhow::{Context, Result, bail};

use crate::PageDeckError;
use std::{path::PathBuf, str::FromStr, time::Duration};

/// Default output filename when none is given.
pub const DEFAULT_OUTPUT_NAME: &str = "merged.pdf";

/// A single reorder instruction, parsed from `FROM:TO` (1-indexed).
///
/// Supports moving a page earlier or later in the sequence:
/// - "3:1" - move the third page to the front
/// - "1:4" - move the first page to the fourth position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSpec {
    /// Zero-based index the page currently occupies.
    pub from: usize,
    /// Zero-based index the page should land at.
    pub to: usize,
}

impl FromStr for MoveSpec {
    type Err = anyhow::Error;

    /// Parse a move specification from a `FROM:TO` string.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is missing, zero, or not a number.
    fn from_str(s: &str) -> Result<Self> {
        let Some((from, to)) = s.split_once(':') else {
            bail!("Invalid move: {s}. Expected format like '3:1'");
        };

        let from: usize = from
            .trim()
            .parse()
            .with_context(|| format!("Invalid page position: {from}"))?;
        let to: usize = to
            .trim()
            .parse()
            .with_context(|| format!("Invalid page position: {to}"))?;

        if from == 0 || to == 0 {
            bail!("Page positions must be positive (1-indexed)");
        }

        Ok(Self {
            from: from - 1,
            to: to - 1,
        })
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Knobs for the ingestion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Render scale for page thumbnails.
    pub thumbnail_scale: f32,
    /// Images whose larger dimension exceeds this are downscaled
    /// proportionally before embedding.
    pub max_image_dimension: u32,
    /// Upper bound on a single image decode.
    pub decode_timeout: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            thumbnail_scale: crate::render::PAGE_THUMBNAIL_SCALE,
            max_image_dimension: 2000,
            decode_timeout: Duration::from_secs(30),
        }
    }
}

/// Complete configuration for a page assembly run.
///
/// This structure contains all settings needed to ingest, rearrange,
/// and export, derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file paths or glob patterns (in ingest order).
    pub inputs: Vec<String>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Dry run mode - ingest and report without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Reorder instructions, applied in order after ingestion.
    pub moves: Vec<MoveSpec>,

    /// 1-indexed page positions to drop after reordering.
    pub drops: Vec<usize>,

    /// List the assembled page sequence instead of writing output.
    pub list: bool,

    /// Emit the page listing as JSON.
    pub json: bool,

    /// Directory to dump rendered page thumbnails into, as PNGs.
    pub thumbnails: Option<PathBuf>,

    /// Ingestion pipeline settings.
    pub ingest: IngestOptions,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[String] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - A drop position is zero
    /// - The output path appears among the inputs
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.drops.contains(&0) {
            bail!(PageDeckError::InvalidConfig {
                message: "Page positions must be positive (1-indexed)".to_string(),
            });
        }

        // The output must not also be an input
        for input in &self.inputs {
            if PathBuf::from(input) == self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// Normalize an output filename: default when empty, append `.pdf` when
/// the extension is missing.
pub fn normalize_output_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_OUTPUT_NAME.to_string();
    }
    if trimmed.to_lowercase().ends_with(".pdf") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.pdf")
    }
}
