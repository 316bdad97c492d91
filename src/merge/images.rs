//! Image page construction.
//!
//! Turns decoded raster images into single-page PDF content: an image
//! XObject (with an SMask when the image carries alpha), a content stream
//! that paints it across the full page, and a page dictionary sized so the
//! image lands at its natural print size.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::{PageDeckError, Result};
use crate::render::Thumbnail;

/// Pixel density images are assumed to carry.
const IMAGE_BASE_DPI: f32 = 96.0;
/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Convert a pixel extent to PDF points at the assumed image density.
pub fn px_to_points(px: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / IMAGE_BASE_DPI
}

/// Embed a raster image as one page of `document`.
///
/// The page's MediaBox is the image's pixel size converted to points, and
/// the content stream scales the XObject to cover it exactly. Returns the
/// id of the page object; the caller owns wiring it into the page tree.
///
/// # Errors
///
/// Returns [`PageDeckError::EmbedFailure`] for degenerate pixel data.
pub fn embed_image(
    document: &mut Document,
    name: &str,
    image: &Thumbnail,
    parent: ObjectId,
) -> Result<ObjectId> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(PageDeckError::embed_failure(
            name,
            "image has zero width or height",
        ));
    }

    // Split interleaved RGBA into the RGB samples and the alpha channel.
    let pixels = image.pixels();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for px in pixels.pixels() {
        rgb.push(px.0[0]);
        rgb.push(px.0[1]);
        rgb.push(px.0[2]);
        alpha.push(px.0[3]);
    }

    let mut img_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    // Fully opaque images skip the SMask entirely.
    if image.has_alpha() {
        let smask_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        };
        let smask_id = document.add_object(Object::Stream(Stream::new(smask_dict, alpha)));
        img_dict.set("SMask", Object::Reference(smask_id));
    }

    let img_id = document.add_object(Object::Stream(Stream::new(img_dict, rgb)));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(img_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_width = px_to_points(width);
    let page_height = px_to_points(height);

    // Paint the XObject across the full MediaBox.
    let content = format!("q\n{page_width} 0 0 {page_height} 0 0 cm\n/Im0 Do\nQ\n");
    let content_id = document.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        content.into_bytes(),
    )));

    let page = dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width),
            Object::Real(page_height),
        ],
        "Resources" => Object::Dictionary(resources),
        "Contents" => Object::Reference(content_id),
    };

    Ok(document.add_object(Object::Dictionary(page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn opaque_thumbnail(width: u32, height: u32) -> Thumbnail {
        Thumbnail::new(RgbaImage::from_pixel(width, height, Rgba([50, 100, 150, 255])))
    }

    fn translucent_thumbnail(width: u32, height: u32) -> Thumbnail {
        Thumbnail::new(RgbaImage::from_pixel(width, height, Rgba([50, 100, 150, 128])))
    }

    #[test]
    fn test_px_to_points() {
        assert!((px_to_points(96) - 72.0).abs() < f32::EPSILON);
        assert!((px_to_points(192) - 144.0).abs() < f32::EPSILON);
        assert!((px_to_points(0) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_embed_opaque_image() {
        let mut doc = Document::with_version("1.5");
        let parent = doc.new_object_id();

        let page_id = embed_image(&mut doc, "a.png", &opaque_thumbnail(96, 48), parent).unwrap();

        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert_eq!(page.get(b"Type").unwrap().as_name().unwrap(), b"Page");

        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((media_box[2].as_float().unwrap() - 72.0).abs() < 0.01);
        assert!((media_box[3].as_float().unwrap() - 36.0).abs() < 0.01);

        // Opaque input: the XObject carries no SMask
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let img_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
        let Object::Stream(img) = doc.get_object(img_id).unwrap() else {
            panic!("expected an image stream");
        };
        assert!(img.dict.get(b"SMask").is_err());
        assert_eq!(img.content.len(), 96 * 48 * 3);
    }

    #[test]
    fn test_embed_translucent_image_gets_smask() {
        let mut doc = Document::with_version("1.5");
        let parent = doc.new_object_id();

        let page_id =
            embed_image(&mut doc, "a.png", &translucent_thumbnail(10, 10), parent).unwrap();

        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let img_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();

        let Object::Stream(img) = doc.get_object(img_id).unwrap() else {
            panic!("expected an image stream");
        };
        let smask_id = img.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let Object::Stream(smask) = doc.get_object(smask_id).unwrap() else {
            panic!("expected an SMask stream");
        };
        assert_eq!(smask.content.len(), 10 * 10);
        assert!(smask.content.iter().all(|&a| a == 128));
    }
}
