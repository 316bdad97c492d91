//! Output writing and saving operations.
//!
//! The export engine hands over finished bytes; this module owns getting
//! them onto disk safely:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite protection
//! - Pre-flight directory checks
//! - Write statistics

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;

use crate::config::OverwriteMode;
use crate::error::{PageDeckError, Result};
use crate::utils::format_file_size;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { atomic: true }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Output writer with configurable behavior.
pub struct OutputWriter {
    options: WriteOptions,
}

impl OutputWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer without atomic writes (faster but less safe).
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions { atomic: false },
        }
    }

    /// Save serialized output bytes to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    /// - Write operation fails
    pub async fn save(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        let write_path = if self.options.atomic {
            path.with_extension("tmp")
        } else {
            path.to_path_buf()
        };

        let mut file = tokio::fs::File::create(&write_path).await.map_err(|e| {
            PageDeckError::FailedToCreateOutput {
                path: write_path.clone(),
                source: e,
            }
        })?;

        file.write_all(bytes)
            .await
            .map_err(|e| PageDeckError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;

        file.flush()
            .await
            .map_err(|e| PageDeckError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;
        drop(file);

        if self.options.atomic {
            tokio::fs::rename(&write_path, path)
                .await
                .map_err(|e| PageDeckError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size: bytes.len() as u64,
            output_path: path.to_path_buf(),
        })
    }

    /// Enforce the overwrite policy for an existing output file.
    ///
    /// Returns `Ok(true)` when the caller should prompt before writing;
    /// `Ok(false)` means the path is clear to write.
    ///
    /// # Errors
    ///
    /// Returns [`PageDeckError::OutputExists`] in no-clobber mode.
    pub async fn check_overwrite(&self, path: &Path, mode: OverwriteMode) -> Result<bool> {
        if !self.exists(path).await {
            return Ok(false);
        }
        match mode {
            OverwriteMode::Force => Ok(false),
            OverwriteMode::Prompt => Ok(true),
            OverwriteMode::NoClobber => Err(PageDeckError::OutputExists {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if parent.as_os_str().is_empty() {
                return Ok(());
            }
            if !parent.exists() {
                return Err(PageDeckError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata =
                tokio::fs::metadata(parent)
                    .await
                    .map_err(|e| PageDeckError::FileNotAccessible {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;

            if metadata.permissions().readonly() {
                return Err(PageDeckError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}
