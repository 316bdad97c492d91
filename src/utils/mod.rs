//! Shared helpers: glob expansion of input patterns and size formatting.

use std::path::PathBuf;

use crate::error::{PageDeckError, Result};

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns that match nothing contribute nothing; order of patterns (and
/// of matches within a pattern) is preserved, since input order determines
/// ingestion order.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from the glob iterator.
pub fn expand_input_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();

        // A literal path that exists short-circuits glob interpretation, so
        // filenames containing `[` or `?` still work.
        let literal = PathBuf::from(pattern);
        if literal.exists() {
            resolved.push(literal);
            continue;
        }

        let entries = glob::glob(pattern).map_err(|err| PageDeckError::Other {
            message: format!("Bad input pattern '{pattern}': {err}"),
        })?;

        for entry in entries {
            let path = entry.map_err(|err| PageDeckError::Other {
                message: format!("Failed to resolve '{pattern}': {err}"),
            })?;
            resolved.push(path);
        }
    }

    Ok(resolved)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
