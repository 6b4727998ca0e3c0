//! Document rendering stages
//!
//! Each stage takes the document as bytes and returns the changed document as
//! bytes, so stages can be chained or swapped independently.

use lopdf::Document;
use crate::asset::RenderedAsset;
use crate::error::{Error, Result};
use crate::pdf::place::place_assets;
use crate::pdf::replace::replace_text;
use crate::substitute::ReplacementSet;

/// Provides PDF loading, text interpolation and image stamping
pub trait PdfRenderer {
    /// Parse a template and serialize it back as a normalized document
    fn render_from_template(&self, template: &[u8]) -> Result<Vec<u8>>;

    /// Run search and replace over the text of every page
    fn render_search_and_replace_text(&self, pdf: &[u8], replacements: &ReplacementSet) -> Result<Vec<u8>>;

    /// Stamp rendered assets onto the single page of the document
    fn render_assets(&self, pdf: &[u8], assets: &[RenderedAsset]) -> Result<Vec<u8>>;
}

/// Renderer backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    fn load(pdf: &[u8]) -> Result<Document> {
        Document::load_mem(pdf).map_err(|e| Error::render("PDF document could not be parsed", e))
    }

    fn save(doc: &mut Document) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| Error::render("PDF document could not be serialized", e))?;
        Ok(out)
    }
}

impl PdfRenderer for LopdfRenderer {
    fn render_from_template(&self, template: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Self::load(template)?;
        log::debug!("Loaded template with {} page(s)", doc.get_pages().len());
        Self::save(&mut doc)
    }

    fn render_search_and_replace_text(&self, pdf: &[u8], replacements: &ReplacementSet) -> Result<Vec<u8>> {
        let mut doc = Self::load(pdf)?;
        let rewritten = replace_text(&mut doc, replacements)?;
        log::info!("Replaced text in {} operand(s)", rewritten);
        Self::save(&mut doc)
    }

    fn render_assets(&self, pdf: &[u8], assets: &[RenderedAsset]) -> Result<Vec<u8>> {
        let mut doc = Self::load(pdf)?;
        place_assets(&mut doc, assets)?;
        doc.compress();
        Self::save(&mut doc)
    }
}
