//! Thumbnails and the page-renderer collaborator seam.
//!
//! A [`Thumbnail`] is the rendered raster representation of one page
//! record. For standalone images it doubles as the re-encodable pixel
//! source at export time, so it always holds real pixels (RGBA, 8-bit).
//!
//! Rasterizing actual PDF page content is an external collaborator
//! concern; the [`PageRenderer`] trait is the seam it plugs into. The
//! built-in [`MediaBoxRenderer`] produces a correctly sized blank bitmap
//! from the page geometry, which keeps thumbnail layout, scaling, and
//! export geometry real without a native rendering backend.

use image::{Rgba, RgbaImage};
use lopdf::{Document, Object};
use std::io::Cursor;

use crate::error::{PageDeckError, Result};

/// Fixed upscale factor for document page thumbnails.
///
/// Pages are rendered at their native layout resolution scaled up for
/// legibility.
pub const PAGE_THUMBNAIL_SCALE: f32 = 1.5;

/// Fallback page size in points (US Letter) when no MediaBox is found.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// A rendered raster representation of a page.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pixels: RgbaImage,
}

impl Thumbnail {
    /// Wrap an already-decoded bitmap.
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Create an opaque white bitmap of the given dimensions.
    ///
    /// Dimensions are clamped to at least 1x1 so degenerate page geometry
    /// can never produce an unusable thumbnail.
    pub fn blank(width: u32, height: u32) -> Self {
        let pixels = RgbaImage::from_pixel(
            width.max(1),
            height.max(1),
            Rgba([0xff, 0xff, 0xff, 0xff]),
        );
        Self { pixels }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the underlying RGBA pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether any pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.pixels.pixels().any(|p| p.0[3] < 0xff)
    }

    /// Encode the bitmap as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| PageDeckError::other(format!("PNG encode failed: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Renders one page of a loaded PDF document to a bitmap.
///
/// This is the seam for the external rendering collaborator; a
/// raster-accurate backend slots in behind the same signature.
pub trait PageRenderer: Send + Sync {
    /// Render the page at `page_index` (zero-based) at the given scale.
    fn render(&self, document: &Document, page_index: usize, scale: f32) -> Result<Thumbnail>;
}

/// Built-in renderer: sizes a blank bitmap from the page's MediaBox.
///
/// MediaBox may be inherited from an ancestor Pages node, so the lookup
/// walks the Parent chain (bounded, in case of cyclic references).
#[derive(Debug, Default, Clone)]
pub struct MediaBoxRenderer;

impl MediaBoxRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for MediaBoxRenderer {
    fn render(&self, document: &Document, page_index: usize, scale: f32) -> Result<Thumbnail> {
        let page_id = document
            .get_pages()
            .into_values()
            .nth(page_index)
            .ok_or_else(|| {
                PageDeckError::other(format!("page index {page_index} out of range"))
            })?;

        let (width_pt, height_pt) = page_size(document, page_id);
        let width = (width_pt * scale).round() as u32;
        let height = (height_pt * scale).round() as u32;

        Ok(Thumbnail::blank(width, height))
    }
}

/// Effective page size in points, honoring MediaBox inheritance.
pub fn page_size(document: &Document, page_id: lopdf::ObjectId) -> (f32, f32) {
    let mut current = Some(page_id);
    // Parent chains are shallow in practice; eight levels is plenty.
    for _ in 0..8 {
        let Some(id) = current else { break };
        let Ok(dict) = document.get_object(id).and_then(Object::as_dict) else {
            break;
        };

        if let Some(size) = media_box_size(dict) {
            return size;
        }

        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok());
    }
    DEFAULT_PAGE_SIZE
}

/// Extract (width, height) from a dictionary's MediaBox entry, if present
/// and well-formed.
fn media_box_size(dict: &lopdf::Dictionary) -> Option<(f32, f32)> {
    let media_box = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if media_box.len() < 4 {
        return None;
    }

    let x0 = media_box[0].as_float().ok()?;
    let y0 = media_box[1].as_float().ok()?;
    let x1 = media_box[2].as_float().ok()?;
    let y1 = media_box[3].as_float().ok()?;

    let width = (x1 - x0).abs();
    let height = (y1 - y0).abs();
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width, height))
}
