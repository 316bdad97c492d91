//! pagedeck - Assemble pages from PDFs and images into a single document.
//!
//! A CLI tool for ingesting mixed PDF and image inputs, rearranging the
//! resulting page sequence, and exporting one merged PDF.

use clap::Parser;
use std::process;

use pagedeck::cli::Cli;
use pagedeck::config::Config;
use pagedeck::error::PageDeckError;
use pagedeck::ingest::Ingestor;
use pagedeck::io::OutputWriter;
use pagedeck::merge::Merger;
use pagedeck::output::{
    OutputFormatter, ProgressLine, display_ingest_report, display_merge_statistics,
    display_page_listing,
};
use pagedeck::session::Session;
use pagedeck::utils::expand_input_patterns;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PageDeckError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let formatter = OutputFormatter::from_config(&config);

    let paths = expand_input_patterns(&config.inputs)?;
    formatter.debug(&format!("Expanded to {} input file(s)", paths.len()));

    // Ingest everything into a fresh session
    let mut session = Session::new();
    let ingestor = Ingestor::new(config.ingest);

    let mut progress = if config.quiet {
        ProgressLine::disabled()
    } else {
        ProgressLine::new()
    };
    let report = ingestor
        .ingest_paths(&mut session, &paths, |update| {
            progress.update(&update.status_line());
        })
        .await;
    progress.finish();
    let report = report?;

    if config.should_print() {
        display_ingest_report(&formatter, &report);
    }

    // Apply reorder and drop instructions
    for spec in &config.moves {
        session.apply_drag(spec.from, spec.to);
    }
    apply_drops(&mut session, &config.drops, &formatter);

    if let Some(dir) = &config.thumbnails {
        let count = dump_thumbnails(&session, dir).await?;
        formatter.info(&format!(
            "Wrote {count} thumbnail(s) to {}",
            dir.display()
        ));
    }

    if config.list {
        display_page_listing(&formatter, &session, config.json)?;
        return Ok(());
    }

    if config.dry_run {
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  {} page(s) would be written to: {}",
            session.snapshot().len(),
            config.output.display()
        ));
        formatter.info("  Run without --dry-run to create the output PDF");
        return Ok(());
    }

    // Assemble the output
    let merger = Merger::new();
    let output_name = config.output.to_string_lossy();
    let bundle = merger.export(&session, &output_name)?;

    if config.should_print() {
        display_merge_statistics(&formatter, &bundle.statistics);
    }

    // Write to disk
    let writer = OutputWriter::new();
    writer.can_write(&config.output).await?;
    if writer
        .check_overwrite(&config.output, config.overwrite_mode)
        .await?
    {
        confirm_overwrite(&config, &formatter)?;
    }

    let write_stats = writer.save(&bundle.bytes, &config.output).await?;

    formatter.success(&format!(
        "Successfully created {} ({})",
        config.output.display(),
        write_stats.format_file_size()
    ));

    Ok(())
}

/// Delete pages by 1-indexed position, evaluated against the sequence
/// after all moves. Out-of-range positions get a warning and are skipped.
fn apply_drops(session: &mut Session, drops: &[usize], formatter: &OutputFormatter) {
    let ids: Vec<_> = drops
        .iter()
        .filter_map(|&position| {
            let page = position
                .checked_sub(1)
                .and_then(|index| session.snapshot().get(index));
            if page.is_none() {
                formatter.warning(&format!("No page at position {position}, skipping"));
            }
            page.map(|p| p.id)
        })
        .collect();

    for id in ids {
        session.delete_page(id);
    }
}

/// Write each page's thumbnail into `dir` as a PNG, named by position.
async fn dump_thumbnails(
    session: &Session,
    dir: &std::path::Path,
) -> Result<usize, PageDeckError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| PageDeckError::FileNotAccessible {
            path: dir.to_path_buf(),
            source,
        })?;

    let snapshot = session.snapshot();
    for (index, page) in snapshot.iter().enumerate() {
        let png = page.thumbnail.to_png()?;
        let path = dir.join(format!("page-{:03}.png", index + 1));
        tokio::fs::write(&path, png)
            .await
            .map_err(|source| PageDeckError::FailedToWrite { path, source })?;
    }
    Ok(snapshot.len())
}

/// Ask the user before overwriting an existing output file.
fn confirm_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<(), PageDeckError> {
    // Quiet mode cannot prompt; treat as no-clobber
    if config.quiet {
        return Err(PageDeckError::OutputExists {
            path: config.output.clone(),
        });
    }

    formatter.warning(&format!(
        "Output file already exists: {}",
        config.output.display()
    ));

    use std::io::{self, Write};
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| PageDeckError::other(format!("Failed to read input: {err}")))?;

    let response = response.trim().to_lowercase();
    if response == "y" || response == "yes" {
        Ok(())
    } else {
        Err(PageDeckError::Cancelled)
    }
}
