//! End-to-end assembly tests: ingest, rearrange, export, write, reload.

use std::str::FromStr;

use pagedeck::config::{IngestOptions, MoveSpec};
use pagedeck::ingest::Ingestor;
use pagedeck::io::OutputWriter;
use pagedeck::merge::Merger;
use pagedeck::session::Session;
use pagedeck::utils::expand_input_patterns;
use tempfile::TempDir;

use crate::common::{page_widths, pdf_with_widths, png_bytes, write_fixture};

#[tokio::test]
async fn test_ingest_reorder_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "doc.pdf", &pdf_with_widths(&[100, 200, 300]));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    let report = ingestor
        .ingest_paths(&mut session, &[input], |_| {})
        .await
        .unwrap();
    assert_eq!(report.total_pages, 3);

    // 100, 200, 300 -> 300, 100, 200
    session.apply_drag(2, 0);

    let bundle = Merger::new().export(&session, "out.pdf").unwrap();

    let output_path = dir.path().join(&bundle.file_name);
    let writer = OutputWriter::new();
    let stats = writer.save(&bundle.bytes, &output_path).await.unwrap();
    assert_eq!(stats.file_size, bundle.bytes.len() as u64);

    let written = std::fs::read(&output_path).unwrap();
    assert_eq!(page_widths(&written), vec![300, 100, 200]);
}

#[tokio::test]
async fn test_mixed_documents_and_images() {
    let dir = TempDir::new().unwrap();
    let doc = write_fixture(dir.path(), "doc.pdf", &pdf_with_widths(&[400, 500]));
    let photo = write_fixture(dir.path(), "photo.png", &png_bytes(96, 192));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &[doc, photo], |_| {})
        .await
        .unwrap();

    let bundle = Merger::new().export(&session, "mixed.pdf").unwrap();

    // The 96px-wide image becomes a 72-point page
    assert_eq!(page_widths(&bundle.bytes), vec![400, 500, 72]);
    assert_eq!(bundle.statistics.document_pages, 2);
    assert_eq!(bundle.statistics.image_pages, 1);
}

#[tokio::test]
async fn test_interleaved_pages_from_two_sources() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", &pdf_with_widths(&[101, 102]));
    let b = write_fixture(dir.path(), "b.pdf", &pdf_with_widths(&[201, 202]));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &[a, b], |_| {})
        .await
        .unwrap();

    // a1 a2 b1 b2 -> a1 b1 a2 b2
    session.apply_drag(2, 1);

    let bundle = Merger::new().export(&session, "out.pdf").unwrap();
    assert_eq!(page_widths(&bundle.bytes), vec![101, 201, 102, 202]);
    assert_eq!(bundle.statistics.sources_loaded, 2);
}

#[tokio::test]
async fn test_cli_style_moves_and_drops() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(
        dir.path(),
        "doc.pdf",
        &pdf_with_widths(&[100, 200, 300, 400]),
    );

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &[input], |_| {})
        .await
        .unwrap();

    // "4:1": 100 200 300 400 -> 400 100 200 300
    let spec = MoveSpec::from_str("4:1").unwrap();
    session.apply_drag(spec.from, spec.to);

    // Drop position 3 (the 200 page)
    let id = session.snapshot()[2].id;
    session.delete_page(id);

    let bundle = Merger::new().export(&session, "out.pdf").unwrap();
    assert_eq!(page_widths(&bundle.bytes), vec![400, 100, 300]);
}

#[tokio::test]
async fn test_glob_expansion_feeds_batch_in_order() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "ch1.pdf", &pdf_with_widths(&[100]));
    write_fixture(dir.path(), "ch2.pdf", &pdf_with_widths(&[200]));
    write_fixture(dir.path(), "notes.txt", b"not an input");

    let pattern = dir.path().join("ch*.pdf");
    let paths = expand_input_patterns([pattern.to_string_lossy().as_ref()]).unwrap();
    assert_eq!(paths.len(), 2);

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, &paths, |_| {})
        .await
        .unwrap();

    let bundle = Merger::new().export(&session, "book").unwrap();
    assert_eq!(bundle.file_name, "book.pdf");
    assert_eq!(page_widths(&bundle.bytes), vec![100, 200]);
}

#[tokio::test]
async fn test_clear_then_reingest_restarts_ids() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "doc.pdf", &pdf_with_widths(&[100, 200]));

    let ingestor = Ingestor::new(IngestOptions::default());
    let mut session = Session::new();
    ingestor
        .ingest_paths(&mut session, std::slice::from_ref(&input), |_| {})
        .await
        .unwrap();
    assert_eq!(session.snapshot()[0].id, 0);

    session.clear();
    assert!(session.snapshot().is_empty());

    ingestor
        .ingest_paths(&mut session, &[input], |_| {})
        .await
        .unwrap();
    // Explicit clear resets id assignment
    assert_eq!(session.snapshot()[0].id, 0);

    let bundle = Merger::new().export(&session, "out.pdf").unwrap();
    assert_eq!(page_widths(&bundle.bytes), vec![100, 200]);
}
