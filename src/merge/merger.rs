//! Core export implementation.
//!
//! Assembles the registry's page sequence into a single output PDF.
//! Document pages are copied from their source documents, image pages are
//! built through [`crate::merge::images`], and the result is serialized to
//! bytes in one all-or-nothing pass: any failure yields an error and no
//! output.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::config::normalize_output_name;
use crate::error::{PageDeckError, Result};
use crate::ingest::has_pdf_signature;
use crate::merge::images::embed_image;
use crate::registry::{PageKind, SourceId};
use crate::session::Session;

/// Statistics about an export operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Total pages in the output document.
    pub total_pages: usize,

    /// Pages copied from source documents.
    pub document_pages: usize,

    /// Pages built from standalone images.
    pub image_pages: usize,

    /// Distinct source documents that were parsed.
    pub sources_loaded: usize,

    /// Total time taken for the export.
    pub merge_time: Duration,

    /// Size of the serialized output in bytes.
    pub output_size: u64,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        crate::utils::format_file_size(self.output_size)
    }
}

/// A finished export: serialized bytes plus the metadata the caller needs
/// to hand the file over.
#[derive(Debug)]
pub struct ExportBundle {
    /// The serialized PDF.
    pub bytes: Vec<u8>,

    /// Normalized output filename (always `.pdf`).
    pub file_name: String,

    /// Statistics about the export.
    pub statistics: MergeStatistics,
}

/// One source document, reparsed and renumbered for the output.
struct LoadedSource {
    /// Pages of the source in original order, keyed by index. The object
    /// ids are already renumbered into the output's id space.
    pages: Vec<(ObjectId, Object)>,
    /// Display name, for error reporting.
    name: String,
}

/// Assembles registry pages into a single PDF.
pub struct Merger;

impl Merger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Export the session's current page sequence.
    ///
    /// Pages come out in exact registry order. Each distinct source
    /// document is parsed exactly once, no matter how many pages reference
    /// it or how they are interleaved.
    ///
    /// # Errors
    ///
    /// - [`PageDeckError::NothingToExport`] when the registry is empty
    /// - [`PageDeckError::InvalidDocumentFormat`] when a stored source no
    ///   longer carries the PDF signature
    /// - [`PageDeckError::PasswordProtected`] / [`PageDeckError::CorruptDocument`]
    ///   when a stored source fails to reparse
    /// - [`PageDeckError::CopyFailure`] when a referenced page is missing
    ///   from its source
    /// - [`PageDeckError::EmbedFailure`] when an image page cannot be built
    /// - [`PageDeckError::SerializationFailure`] when the output cannot be
    ///   serialized
    pub fn export(&self, session: &Session, output_name: &str) -> Result<ExportBundle> {
        let start = Instant::now();

        let snapshot = session.snapshot();
        if snapshot.is_empty() {
            return Err(PageDeckError::NothingToExport);
        }

        let mut output = Document::with_version("1.5");

        // Load each distinct source exactly once, in first-appearance order.
        let mut sources: HashMap<SourceId, LoadedSource> = HashMap::new();
        let mut max_id = 1;
        for page in snapshot {
            let Some(source_id) = page.kind.source() else {
                continue;
            };
            if sources.contains_key(&source_id) {
                continue;
            }
            let loaded = load_source(session, source_id, &mut output, &mut max_id)?;
            sources.insert(source_id, loaded);
        }

        // Reserve the id for the output page tree root before appending
        // image objects.
        output.max_id = max_id.saturating_sub(1).max(output.max_id);
        let pages_id = output.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(snapshot.len());
        let mut document_pages = 0;
        let mut image_pages = 0;

        for page in snapshot {
            match &page.kind {
                PageKind::Document { source, page_index } => {
                    let loaded = sources.get(source).ok_or_else(|| {
                        PageDeckError::copy_failure(
                            &page.source_name,
                            page.original_ordinal,
                            "source document is no longer available",
                        )
                    })?;

                    let (object_id, object) =
                        loaded.pages.get(*page_index).ok_or_else(|| {
                            PageDeckError::copy_failure(
                                &loaded.name,
                                page.original_ordinal,
                                "page is missing from the source document",
                            )
                        })?;

                    let dict = object.as_dict().map_err(|err| {
                        PageDeckError::copy_failure(
                            &loaded.name,
                            page.original_ordinal,
                            err.to_string(),
                        )
                    })?;
                    let mut dict = dict.clone();
                    dict.set("Parent", pages_id);

                    output.objects.insert(*object_id, Object::Dictionary(dict));
                    kids.push(Object::Reference(*object_id));
                    document_pages += 1;
                }
                PageKind::Image => {
                    let page_id =
                        embed_image(&mut output, &page.source_name, &page.thumbnail, pages_id)?;
                    kids.push(Object::Reference(page_id));
                    image_pages += 1;
                }
            }
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        };
        output
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        // Drop source objects no selected page reaches, then tidy ids.
        output.prune_objects();
        output.renumber_objects();
        output.compress();

        let mut bytes = Vec::new();
        output
            .save_to(&mut bytes)
            .map_err(|err| PageDeckError::serialization_failure(err.to_string()))?;

        let statistics = MergeStatistics {
            total_pages: snapshot.len(),
            document_pages,
            image_pages,
            sources_loaded: sources.len(),
            merge_time: start.elapsed(),
            output_size: bytes.len() as u64,
        };

        Ok(ExportBundle {
            bytes,
            file_name: normalize_output_name(output_name),
            statistics,
        })
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Reparse one stored source, renumber it into the shared id space, and
/// move its non-structural objects into the output document.
fn load_source(
    session: &Session,
    source_id: SourceId,
    output: &mut Document,
    max_id: &mut u32,
) -> Result<LoadedSource> {
    let source = session
        .source(source_id)
        .ok_or_else(|| PageDeckError::other("source document is no longer available"))?;

    // The stored bytes are re-verified before parsing; data corrupted
    // after ingestion must not produce a broken export.
    if !has_pdf_signature(&source.bytes) {
        return Err(PageDeckError::invalid_document(&source.name));
    }

    let mut doc = Document::load_mem(&source.bytes)
        .map_err(|err| PageDeckError::from_pdf_load(&source.name, err))?;

    doc.renumber_objects_with(*max_id);
    *max_id = doc.max_id + 1;
    log::debug!(
        "loaded source '{}': {} objects, {} pages",
        source.name,
        doc.objects.len(),
        doc.get_pages().len()
    );

    let pages: Vec<(ObjectId, Object)> = doc
        .get_pages()
        .into_values()
        .map(|object_id| {
            let object = doc.get_object(object_id).map_err(|err| {
                PageDeckError::corrupt_document(&source.name, err.to_string())
            })?;
            Ok((object_id, object.clone()))
        })
        .collect::<Result<_>>()?;

    // Carry over everything except the source's own tree structure; the
    // output builds a fresh Pages/Catalog, and Page objects are copied
    // selectively later.
    for (object_id, object) in doc.objects {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
            _ => {
                output.objects.insert(object_id, object);
            }
        }
    }

    Ok(LoadedSource {
        pages,
        name: source.name.clone(),
    })
}
