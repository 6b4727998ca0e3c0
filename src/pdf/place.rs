//! Stamping raster images onto a single-page document
//!
//! Every asset becomes an image XObject drawn by a content stream appended
//! after the page content. The original content is wrapped in `q`/`Q` so any
//! transformation it leaves behind does not move the stamped images.

use std::io::Write;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use crate::asset::RenderedAsset;
use crate::error::{Error, Result};
use crate::layout::{resolve_coordinate, PageBounds};
use crate::pdf::metadata::page_bounds;

/// A decoded image with its absolute position on the page
#[derive(Debug, Clone)]
pub struct PlacedAsset {
    pub image: DynamicImage,
    pub x: f32,
    pub y: f32,
}

impl PlacedAsset {
    /// Decode the asset and resolve its offsets against the page bounds
    pub fn resolve(asset: &RenderedAsset, bounds: PageBounds) -> Result<Self> {
        let image = image::load_from_memory(&asset.data)
            .map_err(|e| Error::render("Image could not be decoded", e))?;

        let x = resolve_coordinate(asset.x, bounds.width, image.width() as f32);
        let y = resolve_coordinate(asset.y, bounds.height, image.height() as f32);

        Ok(Self { image, x, y })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Content stream operators drawing this asset through the named XObject
    fn draw_operations(&self, name: &str) -> String {
        format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            self.width(),
            self.height(),
            self.x,
            self.y,
            name
        )
    }
}

/// Embed `assets` on the only page of `doc`, in order
///
/// Returns the placed assets. Nothing is changed when `assets` is empty.
///
/// # Errors
///
/// [`Error::TooManyPages`] when the document has more than one page.
pub fn place_assets(doc: &mut Document, assets: &[RenderedAsset]) -> Result<Vec<PlacedAsset>> {
    if assets.is_empty() {
        return Ok(Vec::new());
    }

    let pages = doc.get_pages();
    if pages.len() > 1 {
        return Err(Error::TooManyPages(pages.len()));
    }
    let page_id = match pages.values().next() {
        Some(id) => *id,
        None => {
            return Err(Error::InvalidArgument(
                "Cannot place images on a document without pages".to_string(),
            ))
        }
    };

    let bounds = page_bounds(doc, page_id);
    let mut content = String::new();
    let mut xobjects = Vec::with_capacity(assets.len());
    let mut placed = Vec::with_capacity(assets.len());

    for asset in assets {
        let resolved = PlacedAsset::resolve(asset, bounds)?;
        let xobject_id = add_image_xobject(doc, &resolved.image)?;
        let name = format!("Img{}", xobject_id.0);

        log::debug!(
            "Placing {}x{} image at ({}, {}) as /{}",
            resolved.width(),
            resolved.height(),
            resolved.x,
            resolved.y,
            name
        );

        content.push_str(&resolved.draw_operations(&name));
        xobjects.push((name, xobject_id));
        placed.push(resolved);
    }

    add_xobjects_to_page_resources(doc, page_id, &xobjects)?;

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    prepend_content_to_page(doc, page_id, save_id)?;

    let stamp = format!("Q\n{}", content);
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp.into_bytes()));
    append_content_to_page(doc, page_id, stamp_id)?;

    log::info!("Placed {} image(s) on a {}x{} page", placed.len(), bounds.width, bounds.height);

    Ok(placed)
}

/// Add an image XObject, gray or RGB depending on the source, with an SMask for alpha
fn add_image_xobject(doc: &mut Document, image: &DynamicImage) -> Result<ObjectId> {
    let color = image.color();
    let (color_space, samples) = if color.has_color() {
        ("DeviceRGB", image.to_rgb8().into_raw())
    } else {
        ("DeviceGray", image.to_luma8().into_raw())
    };

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width() as i64,
        "Height" => image.height() as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if color.has_alpha() {
        let alpha: Vec<u8> = image.to_rgba8().pixels().map(|pixel| pixel[3]).collect();
        let smask = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let smask_id = doc.add_object(Stream::new(smask, compress_data(&alpha)?).with_compression(false));
        dict.set("SMask", Object::Reference(smask_id));
    }

    let stream = Stream::new(dict, compress_data(&samples)?).with_compression(false);
    Ok(doc.add_object(stream))
}

/// Compress data using zlib
fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Resources that apply to a page, following `/Parent` when the page has none
fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = doc.get_dictionary(page_id).ok();
    for _ in 0..32 {
        let Some(dict) = current else { break };

        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return resources.clone(),
            Ok(Object::Reference(id)) => {
                if let Ok(resources) = doc.get_dictionary(*id) {
                    return resources.clone();
                }
            }
            _ => {}
        }

        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => doc.get_dictionary(*parent_id).ok(),
            _ => None,
        };
    }
    Dictionary::new()
}

/// Register XObjects in the page's own Resources dictionary
fn add_xobjects_to_page_resources(
    doc: &mut Document,
    page_id: ObjectId,
    xobjects: &[(String, ObjectId)],
) -> Result<()> {
    let mut resources = effective_resources(doc, page_id);

    let mut xobject_dict = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_default(),
        _ => Dictionary::new(),
    };

    for (name, id) in xobjects {
        xobject_dict.set(name.as_bytes().to_vec(), Object::Reference(*id));
    }
    resources.set("XObject", Object::Dictionary(xobject_dict));

    // The page gets its own copy so inherited resources stay untouched
    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Resources", Object::Dictionary(resources));

    Ok(())
}

/// Prepend a content stream to a page's Contents
fn prepend_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary_mut(page_id)?;

    let contents = match page.get(b"Contents").ok().cloned() {
        Some(Object::Reference(content_id)) => vec![
            Object::Reference(new_content_id),
            Object::Reference(content_id),
        ],
        Some(Object::Array(mut content_array)) => {
            content_array.insert(0, Object::Reference(new_content_id));
            content_array
        }
        _ => vec![Object::Reference(new_content_id)],
    };
    page.set("Contents", Object::Array(contents));

    Ok(())
}

/// Append a content stream to a page's Contents, so it draws on top
fn append_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary_mut(page_id)?;

    let contents = match page.get(b"Contents").ok().cloned() {
        Some(Object::Reference(content_id)) => vec![
            Object::Reference(content_id),
            Object::Reference(new_content_id),
        ],
        Some(Object::Array(mut content_array)) => {
            content_array.push(Object::Reference(new_content_id));
            content_array
        }
        _ => vec![Object::Reference(new_content_id)],
    };
    page.set("Contents", Object::Array(contents));

    Ok(())
}
