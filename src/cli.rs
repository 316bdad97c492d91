//! CLI argument parsing for pagedeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{Config, IngestOptions, MoveSpec, OverwriteMode, normalize_output_name};
use crate::error::{PageDeckError, Result};

/// Assemble pages from PDFs and images into a single document.
///
/// pagedeck ingests PDF documents and raster images, keeps their pages in
/// an ordered sequence that can be rearranged and trimmed, and exports the
/// result as one merged PDF.
#[derive(Parser, Debug)]
#[command(name = "pagedeck")]
#[command(version)]
#[command(about = "Assemble pages from PDFs and images into a single PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files to ingest (in order)
    ///
    /// PDF documents contribute one page per source page; images
    /// contribute a single page each. Glob patterns are expanded.
    ///
    /// Examples:
    ///   pagedeck scan.pdf photo.jpg -o bundle.pdf
    ///   pagedeck 'chapter*.pdf' -o book.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// A missing `.pdf` extension is appended automatically.
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE", default_value = "merged.pdf")]
    pub output: String,

    /// Move a page to a new position (may be repeated)
    ///
    /// FROM:TO, both 1-indexed positions in the ingested sequence.
    /// Moves are applied in the order given, after all files have
    /// been ingested.
    ///
    /// Example:
    ///   pagedeck a.pdf b.pdf --move 3:1 -o out.pdf
    #[arg(long = "move", value_name = "FROM:TO")]
    pub moves: Vec<String>,

    /// Drop a page by position (may be repeated)
    ///
    /// 1-indexed position in the sequence, evaluated after all
    /// --move instructions.
    #[arg(long = "drop", value_name = "N")]
    pub drops: Vec<usize>,

    /// List the assembled page sequence instead of writing output
    #[arg(short, long)]
    pub list: bool,

    /// Dump the rendered page thumbnails as PNG files into a directory
    ///
    /// One file per page, named by output position. The directory is
    /// created if it does not exist.
    #[arg(long, value_name = "DIR")]
    pub thumbnails: Option<PathBuf>,

    /// Emit the page listing as JSON (implies --list)
    #[arg(long)]
    pub json: bool,

    /// Dry run - ingest and validate without creating output
    ///
    /// Processes every input and reports what the export would
    /// contain, without writing the output file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show detailed information per file
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    ///
    /// By default, pagedeck will prompt before overwriting an existing
    /// file. Use this flag to skip the confirmation prompt.
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Largest allowed image dimension in pixels
    ///
    /// Images wider or taller than this are downscaled proportionally
    /// before embedding.
    #[arg(long, value_name = "PX", default_value_t = 2000)]
    pub max_image_dimension: u32,

    /// Timeout for decoding a single image, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub decode_timeout: u64,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A --move specification is malformed
    /// - A --drop position is zero
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let moves = self
            .moves
            .iter()
            .map(|spec| {
                MoveSpec::from_str(spec).map_err(|e| PageDeckError::invalid_config(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.inputs.clone(),
            output: PathBuf::from(normalize_output_name(&self.output)),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            moves,
            drops: self.drops.clone(),
            list: self.list || self.json,
            json: self.json,
            thumbnails: self.thumbnails.clone(),
            ingest: IngestOptions {
                max_image_dimension: self.max_image_dimension,
                decode_timeout: Duration::from_secs(self.decode_timeout),
                ..IngestOptions::default()
            },
        };

        config.validate().map_err(|e| {
            PageDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        // Shouldn't happen with clap, but be safe
        if self.inputs.is_empty() {
            return Err(PageDeckError::invalid_config("No input files specified"));
        }

        if self.max_image_dimension == 0 {
            return Err(PageDeckError::invalid_config(
                "Maximum image dimension must be at least 1",
            ));
        }

        if self.decode_timeout == 0 {
            return Err(PageDeckError::invalid_config(
                "Decode timeout must be at least 1 second",
            ));
        }

        for spec in &self.moves {
            MoveSpec::from_str(spec).map_err(|e| PageDeckError::invalid_config(e.to_string()))?;
        }

        Ok(())
    }
}
