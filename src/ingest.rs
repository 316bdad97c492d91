//! File ingestion pipeline.
//!
//! Turns raw file bytes into registry pages:
//! - Classification by declared media type, falling back to extension
//! - Image decoding with a bounded timeout and proportional downscaling
//! - PDF signature checking, loading, and per-page thumbnail rendering
//! - Sequential batch processing with per-page progress reporting
//!
//! A batch is processed one file at a time; the first failing file aborts
//! the batch, but pages appended by earlier files stay in the registry.

use std::path::Path;
use std::time::{Duration, Instant};

use image::DynamicImage;
use image::imageops::FilterType;
use lopdf::Document;

use crate::config::IngestOptions;
use crate::error::{PageDeckError, Result};
use crate::registry::{PageDraft, PageId, PageKind};
use crate::render::{MediaBoxRenderer, PageRenderer, Thumbnail};
use crate::session::Session;

/// How far into a file the PDF signature may appear.
const SIGNATURE_WINDOW: usize = 1024;

/// File classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A PDF document.
    Pdf,
    /// A raster image.
    Image,
}

/// Classify a file by declared media type, then by extension.
///
/// The declared media type (e.g. from a drag-and-drop payload) wins when
/// present and recognized. Otherwise the filename extension decides:
/// anything the `image` crate knows, plus `.heic`/`.heif`, plus `.pdf`.
///
/// # Errors
///
/// Returns [`PageDeckError::UnsupportedFormat`] when neither side matches.
pub fn classify(name: &str, declared_media_type: Option<&str>) -> Result<FileKind> {
    if let Some(media_type) = declared_media_type {
        let media_type = media_type.trim().to_lowercase();
        if media_type == "application/pdf" {
            return Ok(FileKind::Pdf);
        }
        if media_type.starts_with("image/") {
            return Ok(FileKind::Image);
        }
    }

    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if extension == "pdf" {
        return Ok(FileKind::Pdf);
    }
    // HEIC carries no entry in the image crate's extension table but is a
    // common camera format, so it classifies as an image and surfaces a
    // decode error later if the codec cannot handle it.
    if extension == "heic" || extension == "heif" {
        return Ok(FileKind::Image);
    }
    if image::ImageFormat::from_extension(&extension).is_some() {
        return Ok(FileKind::Image);
    }

    Err(PageDeckError::unsupported_format(name))
}

/// Check for the `%PDF-` signature anywhere in the first 1024 bytes.
///
/// Real-world PDFs occasionally carry junk before the header, so the
/// signature is searched in a window rather than required at offset zero.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    const SIGNATURE: &[u8] = b"%PDF-";
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    window
        .windows(SIGNATURE.len())
        .any(|chunk| chunk == SIGNATURE)
}

/// Progress report issued while a batch is being ingested.
#[derive(Debug, Clone)]
pub struct IngestProgress {
    /// Zero-based index of the file within the batch.
    pub file_index: usize,
    /// Number of files in the batch.
    pub file_count: usize,
    /// Name of the file being processed.
    pub file_name: String,
    /// 1-based page being rendered, when known.
    pub page: usize,
    /// Total pages in the current file, when known (0 while loading).
    pub page_count: usize,
}

impl IngestProgress {
    /// Human-readable status line for this progress point.
    pub fn status_line(&self) -> String {
        if self.page_count > 0 {
            format!(
                "Processing {} - Page {}/{}",
                self.file_name, self.page, self.page_count
            )
        } else {
            format!("Processing {}", self.file_name)
        }
    }
}

/// Result of ingesting a single file.
#[derive(Debug, Clone)]
pub struct IngestedFile {
    /// Display name of the file.
    pub name: String,
    /// What the file classified as.
    pub kind: FileKind,
    /// Ids of the registry pages this file produced, in page order.
    pub page_ids: Vec<PageId>,
    /// Size of the file in bytes.
    pub file_size: u64,
    /// Time taken to ingest the file.
    pub elapsed: Duration,
}

/// Aggregate statistics for a completed batch.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Per-file outcomes, in batch order.
    pub files: Vec<IngestedFile>,
    /// Total pages appended by the batch.
    pub total_pages: usize,
    /// Total bytes ingested.
    pub total_size: u64,
    /// Wall-clock time for the whole batch.
    pub total_time: Duration,
}

impl IngestReport {
    fn record(&mut self, file: IngestedFile) {
        self.total_pages += file.page_ids.len();
        self.total_size += file.file_size;
        self.files.push(file);
    }
}

/// The ingestion pipeline.
///
/// Holds the decode/render settings and the page renderer. Files are fed
/// in as `(name, bytes)` pairs so the same pipeline serves both disk paths
/// and in-memory payloads.
pub struct Ingestor {
    options: IngestOptions,
    renderer: Box<dyn PageRenderer>,
}

impl Ingestor {
    /// Create a pipeline with default options and the built-in renderer.
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            renderer: Box::new(MediaBoxRenderer::new()),
        }
    }

    /// Create a pipeline with a custom page renderer.
    pub fn with_renderer(options: IngestOptions, renderer: Box<dyn PageRenderer>) -> Self {
        Self { options, renderer }
    }

    /// Ingest one file into the session.
    ///
    /// A file contributes pages only when it ingests completely: nothing is
    /// appended to the registry until every page of the file has rendered.
    ///
    /// # Errors
    ///
    /// Classification, decode, and load failures surface as the matching
    /// ingest error; the session is left untouched in that case.
    pub async fn ingest_file<F>(
        &self,
        session: &mut Session,
        name: &str,
        bytes: Vec<u8>,
        declared_media_type: Option<&str>,
        mut on_page: F,
    ) -> Result<IngestedFile>
    where
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let file_size = bytes.len() as u64;
        let kind = classify(name, declared_media_type)?;
        log::debug!("ingesting {name} ({file_size} bytes) as {kind:?}");

        let drafts = match kind {
            FileKind::Image => vec![self.ingest_image(name, bytes).await?],
            FileKind::Pdf => self.ingest_pdf(session, name, bytes, &mut on_page).await?,
        };

        let page_ids: Vec<PageId> = drafts
            .into_iter()
            .map(|draft| session.append_page(draft))
            .collect();

        Ok(IngestedFile {
            name: name.to_string(),
            kind,
            page_ids,
            file_size,
            elapsed: start.elapsed(),
        })
    }

    /// Ingest a batch of files from disk, sequentially.
    ///
    /// Stops at the first failure and returns it; pages appended by files
    /// earlier in the batch remain in the registry.
    pub async fn ingest_paths<F>(
        &self,
        session: &mut Session,
        paths: &[std::path::PathBuf],
        mut on_progress: F,
    ) -> Result<IngestReport>
    where
        F: FnMut(&IngestProgress),
    {
        let start = Instant::now();
        let mut report = IngestReport::default();

        for (file_index, path) in paths.iter().enumerate() {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unnamed")
                .to_string();

            on_progress(&IngestProgress {
                file_index,
                file_count: paths.len(),
                file_name: name.clone(),
                page: 0,
                page_count: 0,
            });

            let bytes = tokio::fs::read(path).await.map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    PageDeckError::FileNotFound { path: path.clone() }
                } else {
                    PageDeckError::FileNotAccessible {
                        path: path.clone(),
                        source,
                    }
                }
            })?;

            let file = self
                .ingest_file(session, &name, bytes, None, |page, page_count| {
                    on_progress(&IngestProgress {
                        file_index,
                        file_count: paths.len(),
                        file_name: name.clone(),
                        page,
                        page_count,
                    });
                })
                .await?;

            report.record(file);
        }

        report.total_time = start.elapsed();
        Ok(report)
    }

    /// Decode an image off the async runtime, bounded by the configured
    /// timeout, and downscale it to fit the embedding bound.
    async fn ingest_image(&self, name: &str, bytes: Vec<u8>) -> Result<PageDraft> {
        let decoded = decode_image(name, bytes, self.options.decode_timeout).await?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(PageDeckError::corrupt_image(
                name,
                "image has zero width or height",
            ));
        }

        let max_dim = self.options.max_image_dimension;
        let decoded = if decoded.width().max(decoded.height()) > max_dim {
            decoded.resize(max_dim, max_dim, FilterType::Lanczos3)
        } else {
            decoded
        };

        Ok(PageDraft {
            kind: PageKind::Image,
            source_name: name.to_string(),
            thumbnail: Thumbnail::new(decoded.to_rgba8()),
            original_ordinal: 1,
        })
    }

    /// Load a PDF, register it as a source, and render one draft per page.
    async fn ingest_pdf<F>(
        &self,
        session: &mut Session,
        name: &str,
        bytes: Vec<u8>,
        on_page: &mut F,
    ) -> Result<Vec<PageDraft>>
    where
        F: FnMut(usize, usize),
    {
        if !has_pdf_signature(&bytes) {
            return Err(PageDeckError::invalid_document(name));
        }

        let document = load_pdf(name, bytes.clone()).await?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PageDeckError::corrupt_document(name, "PDF has no pages"));
        }

        // Render everything before touching the session, so a failed file
        // leaves no orphaned source bytes behind.
        let mut thumbnails = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            on_page(page_index + 1, page_count);
            let thumbnail =
                self.renderer
                    .render(&document, page_index, self.options.thumbnail_scale)?;
            thumbnails.push(thumbnail);
        }

        let source = session.register_source(name, bytes);

        Ok(thumbnails
            .into_iter()
            .enumerate()
            .map(|(page_index, thumbnail)| PageDraft {
                kind: PageKind::Document { source, page_index },
                source_name: name.to_string(),
                thumbnail,
                original_ordinal: page_index + 1,
            })
            .collect())
    }
}

/// Decode image bytes on a blocking thread with a timeout.
async fn decode_image(name: &str, bytes: Vec<u8>, timeout: Duration) -> Result<DynamicImage> {
    let task = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes));

    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(PageDeckError::corrupt_image(name, "image decode timed out")),
        Ok(Err(join_err)) => Err(PageDeckError::corrupt_image(name, join_err.to_string())),
        Ok(Ok(Err(decode_err))) => Err(PageDeckError::corrupt_image(name, decode_err.to_string())),
        Ok(Ok(Ok(image))) => Ok(image),
    }
}

/// Parse PDF bytes on a blocking thread, classifying failures.
async fn load_pdf(name: &str, bytes: Vec<u8>) -> Result<Document> {
    let owned_name = name.to_string();
    tokio::task::spawn_blocking(move || {
        Document::load_mem(&bytes).map_err(|err| PageDeckError::from_pdf_load(&owned_name, err))
    })
    .await
    .map_err(|join_err| PageDeckError::other(join_err.to_string()))?
}
