//! Failure-path tests: classification, corrupt inputs, batch aborts, and
//! export guards.

use pagedeck::PageDeckError;
use pagedeck::config::{IngestOptions, OverwriteMode};
use pagedeck::ingest::Ingestor;
use pagedeck::io::OutputWriter;
use pagedeck::merge::Merger;
use pagedeck::session::Session;
use tempfile::TempDir;

use crate::common::{pdf_with_widths, png_bytes, write_fixture};

#[tokio::test]
async fn test_unsupported_extension_aborts_batch() {
    let dir = TempDir::new().unwrap();
    let ok = write_fixture(dir.path(), "ok.pdf", &pdf_with_widths(&[100]));
    let bad = write_fixture(dir.path(), "notes.txt", b"plain text");

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();

    let err = ingestor
        .ingest_paths(&mut session, &[ok, bad], |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::UnsupportedFormat { .. }));
    assert_eq!(err.exit_code(), 3);
    // The valid file's page survived the abort
    assert_eq!(session.registry().len(), 1);
}

#[tokio::test]
async fn test_pdf_without_signature_is_invalid_document() {
    let dir = TempDir::new().unwrap();
    let fake = write_fixture(dir.path(), "fake.pdf", b"<html>not a pdf</html>");

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();

    let err = ingestor
        .ingest_paths(&mut session, &[fake], |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::InvalidDocumentFormat { .. }));
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_truncated_pdf_is_corrupt_document() {
    let dir = TempDir::new().unwrap();
    let mut bytes = pdf_with_widths(&[100]);
    bytes.truncate(bytes.len() / 2);
    let truncated = write_fixture(dir.path(), "truncated.pdf", &bytes);

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();

    let err = ingestor
        .ingest_paths(&mut session, &[truncated], |_| {})
        .await
        .unwrap_err();

    assert!(err.is_ingest_error());
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_corrupt_image_is_classified() {
    let dir = TempDir::new().unwrap();
    // PNG magic followed by nothing decodable
    let bad = write_fixture(dir.path(), "broken.png", &[0x89, 0x50, 0x4E, 0x47, 0x00]);

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();

    let err = ingestor
        .ingest_paths(&mut session, &[bad], |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::CorruptImage { .. }));
}

#[tokio::test]
async fn test_heic_that_cannot_decode_is_corrupt_image() {
    let dir = TempDir::new().unwrap();
    let heic = write_fixture(dir.path(), "shot.heic", b"\x00\x00\x00\x18ftypheic");

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();

    let err = ingestor
        .ingest_paths(&mut session, &[heic], |_| {})
        .await
        .unwrap_err();

    // Classified as an image by extension, then rejected at decode
    assert!(matches!(err, PageDeckError::CorruptImage { .. }));
}

#[test]
fn test_export_with_no_pages_fails() {
    let session = Session::new();
    let err = Merger::new().export(&session, "out.pdf").unwrap_err();
    assert!(matches!(err, PageDeckError::NothingToExport));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_export_after_deleting_everything_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "doc.pdf", &pdf_with_widths(&[100]));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &[input], |_| {})
        .await
        .unwrap();

    session.toggle_select_all();
    assert_eq!(session.delete_selected(), 1);

    let err = Merger::new().export(&session, "out.pdf").unwrap_err();
    assert!(matches!(err, PageDeckError::NothingToExport));
}

#[tokio::test]
async fn test_no_clobber_refuses_existing_output() {
    let dir = TempDir::new().unwrap();
    let existing = write_fixture(dir.path(), "out.pdf", b"already here");

    let writer = OutputWriter::new();
    let err = writer
        .check_overwrite(&existing, OverwriteMode::NoClobber)
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    // Untouched
    assert_eq!(std::fs::read(&existing).unwrap(), b"already here");
}

#[tokio::test]
async fn test_failed_export_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let session = Session::new();

    let result = Merger::new().export(&session, "out.pdf");
    assert!(result.is_err());

    // All-or-nothing: no output and no temp leftovers appear on failure
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_image_only_session_exports() {
    let dir = TempDir::new().unwrap();
    let photo = write_fixture(dir.path(), "photo.png", &png_bytes(48, 48));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &[photo], |_| {})
        .await
        .unwrap();

    let bundle = Merger::new().export(&session, "out.pdf").unwrap();
    assert_eq!(bundle.statistics.image_pages, 1);
    assert_eq!(bundle.statistics.sources_loaded, 0);
    assert_eq!(bundle.statistics.document_pages, 0);

    let doc = lopdf::Document::load_mem(&bundle.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}
