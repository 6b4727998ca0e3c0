//! PDF metadata and page geometry

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::layout::PageBounds;

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
    /// Size of the first page
    pub first_page: Option<PageBounds>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let pages = doc.get_pages();

    let first_page = pages
        .values()
        .next()
        .map(|page_id| page_bounds(&doc, *page_id));

    Ok(PdfMetadata {
        page_count: pages.len(),
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
        first_page,
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    Ok(doc.get_pages().len())
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// Size of a page from its MediaBox
///
/// The box is looked up on the page and then up the `/Parent` chain. Pages
/// without any MediaBox are treated as US Letter.
pub fn page_bounds(doc: &Document, page_id: ObjectId) -> PageBounds {
    let mut current = doc.get_dictionary(page_id).ok();
    // page trees are shallow, the bound guards against reference cycles
    for _ in 0..32 {
        let Some(dict) = current else { break };

        if let Some(rect) = media_box(doc, dict) {
            return PageBounds::from_rect(rect);
        }

        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => doc.get_dictionary(*parent_id).ok(),
            _ => None,
        };
    }

    PageBounds::letter()
}

fn media_box(doc: &Document, dict: &Dictionary) -> Option<[f32; 4]> {
    let object = match dict.get(b"MediaBox").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    let values = object.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut rect = [0.0f32; 4];
    for (slot, value) in rect.iter_mut().zip(values) {
        *slot = match value {
            Object::Integer(n) => *n as f32,
            Object::Real(n) => *n,
            _ => return None,
        };
    }
    Some(rect)
}
