//! Text substitution across every page of a document

use lopdf::content::Content;
use lopdf::Document;
use crate::error::{Error, Result};
use crate::pdf::content::{rewrite_tokens, tokenize, untokenize};
use crate::substitute::ReplacementSet;

/// Rewrite the show-text operands of every page
///
/// Pages where nothing changed keep their original content stream. Returns
/// the total number of rewritten operands.
pub fn replace_text(doc: &mut Document, replacements: &ReplacementSet) -> Result<usize> {
    if replacements.is_empty() {
        return Ok(0);
    }

    let mut total = 0;
    for (page_number, page_id) in doc.get_pages() {
        let raw = doc.get_page_content(page_id)?;
        let content = Content::decode(&raw)?;

        let mut tokens = tokenize(content.operations);
        let rewritten = rewrite_tokens(&mut tokens, replacements)?;

        if rewritten == 0 {
            continue;
        }

        let encoded = Content { operations: untokenize(tokens)? }
            .encode()
            .map_err(|e| Error::render(format!("Page {} content could not be encoded", page_number), e))?;
        doc.change_page_content(page_id, encoded)?;

        log::debug!("Page {}: rewrote {} text operand(s)", page_number, rewritten);
        total += rewritten;
    }

    Ok(total)
}
