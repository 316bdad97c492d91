//! Error types for pagedeck.
//!
//! Every fallible operation in the crate reports one of these variants.
//! Messages are written to be actionable: they name the offending source
//! file and, where possible, suggest a remedy instead of echoing a raw
//! library diagnostic.
//!
//! # Error Categories
//!
//! - **Ingestion errors**: unsupported or unreadable uploads
//!   ([`UnsupportedFormat`](PageDeckError::UnsupportedFormat),
//!   [`CorruptImage`](PageDeckError::CorruptImage),
//!   [`InvalidDocumentFormat`](PageDeckError::InvalidDocumentFormat),
//!   [`PasswordProtected`](PageDeckError::PasswordProtected),
//!   [`CorruptDocument`](PageDeckError::CorruptDocument))
//! - **Export errors**: failures while assembling the output document
//!   ([`CopyFailure`](PageDeckError::CopyFailure),
//!   [`EmbedFailure`](PageDeckError::EmbedFailure),
//!   [`SerializationFailure`](PageDeckError::SerializationFailure))
//! - **I/O and configuration errors**: filesystem and argument problems
//!
//! All variants are terminal for the operation that raised them: an
//! ingestion error aborts the current file, an export error aborts the
//! whole export. Nothing is silently retried.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for pagedeck operations.
pub type Result<T> = std::result::Result<T, PageDeckError>;

/// Main error type for pagedeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PageDeckError {
    /// The uploaded file is neither a PDF nor a recognized image type.
    #[error(
        "Unsupported file type: {name}\n  \
         Supported: PDF documents and JPEG, PNG, GIF, WebP, BMP, TIFF, HEIC images"
    )]
    UnsupportedFormat {
        /// Display name of the rejected file.
        name: String,
    },

    /// An image file could not be decoded into a usable bitmap.
    #[error(
        "Could not read image: {name}\n  Details: {details}\n  \
         Hint: re-export the image as PNG or JPEG and try again"
    )]
    CorruptImage {
        /// Display name of the image file.
        name: String,
        /// What went wrong during decoding.
        details: String,
    },

    /// The file claims to be a PDF but carries no PDF signature.
    #[error(
        "Not a valid PDF: {name}\n  \
         The file does not start with a PDF signature. It may have been \
         renamed from another format or truncated during transfer"
    )]
    InvalidDocumentFormat {
        /// Display name of the file.
        name: String,
    },

    /// The PDF requires a password to open.
    #[error(
        "PDF is password protected: {name}\n  \
         Hint: decrypt it first, e.g. with 'qpdf --decrypt', then re-add it"
    )]
    PasswordProtected {
        /// Display name of the document.
        name: String,
    },

    /// The PDF carries a signature but its structure cannot be parsed.
    #[error("Corrupted or invalid PDF: {name}\n  Details: {details}")]
    CorruptDocument {
        /// Display name of the document.
        name: String,
        /// Details about the corruption.
        details: String,
    },

    /// A page could not be copied from its source document at export time.
    #[error(
        "Failed to copy page {page} from {name}\n  Details: {details}\n  \
         The source may have changed since it was added; remove and re-add it"
    )]
    CopyFailure {
        /// Display name of the source document.
        name: String,
        /// 1-based page number within the source.
        page: usize,
        /// Details about the failure.
        details: String,
    },

    /// An image could not be embedded into the output document.
    #[error("Failed to embed image {name}\n  Details: {details}")]
    EmbedFailure {
        /// Display name of the image.
        name: String,
        /// Details about the failure.
        details: String,
    },

    /// The assembled document could not be serialized to bytes.
    #[error("Failed to write the assembled PDF\n  Details: {details}")]
    SerializationFailure {
        /// Details about the failure.
        details: String,
    },

    /// Export was triggered with an empty page list.
    #[error("Nothing to export: add at least one PDF or image first")]
    NothingToExport,

    /// Input file was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file exists but cannot be read.
    #[error("Cannot access file: {path}\n  Reason: {source}")]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {path}\n  \
         Use --force to overwrite or choose a different output path"
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {path}\n  Reason: {source}")]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to output file: {path}\n  Reason: {source}")]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration or argument combination.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PageDeckError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PageDeckError {
    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create a CorruptImage error.
    pub fn corrupt_image(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptImage {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidDocumentFormat error.
    pub fn invalid_document(name: impl Into<String>) -> Self {
        Self::InvalidDocumentFormat { name: name.into() }
    }

    /// Create a PasswordProtected error.
    pub fn password_protected(name: impl Into<String>) -> Self {
        Self::PasswordProtected { name: name.into() }
    }

    /// Create a CorruptDocument error.
    pub fn corrupt_document(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptDocument {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create a CopyFailure error. `page` is the 1-based source page number.
    pub fn copy_failure(name: impl Into<String>, page: usize, details: impl Into<String>) -> Self {
        Self::CopyFailure {
            name: name.into(),
            page,
            details: details.into(),
        }
    }

    /// Create an EmbedFailure error.
    pub fn embed_failure(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::EmbedFailure {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create a SerializationFailure error.
    pub fn serialization_failure(details: impl Into<String>) -> Self {
        Self::SerializationFailure {
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify a PDF load failure into password vs corruption.
    ///
    /// lopdf reports encryption through its error text; anything that
    /// mentions encryption or passwords becomes
    /// [`PasswordProtected`](Self::PasswordProtected), everything else
    /// [`CorruptDocument`](Self::CorruptDocument).
    pub fn from_pdf_load(name: impl Into<String>, err: impl fmt::Display) -> Self {
        let msg = err.to_string();
        let lowered = msg.to_lowercase();
        if lowered.contains("encrypt") || lowered.contains("password") {
            Self::password_protected(name)
        } else {
            Self::corrupt_document(name, msg)
        }
    }

    /// Whether this error concerns a single ingested file (the batch can
    /// report it and leave earlier successes in place).
    pub fn is_ingest_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::CorruptImage { .. }
                | Self::InvalidDocumentFormat { .. }
                | Self::PasswordProtected { .. }
                | Self::CorruptDocument { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::FileNotAccessible { .. } => 2,
            Self::UnsupportedFormat { .. }
            | Self::CorruptImage { .. }
            | Self::InvalidDocumentFormat { .. }
            | Self::PasswordProtected { .. }
            | Self::CorruptDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::CopyFailure { .. }
            | Self::EmbedFailure { .. }
            | Self::SerializationFailure { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::NothingToExport | Self::InvalidConfig { .. } | Self::Other { .. } => 1,
        }
    }
}
