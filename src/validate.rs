//! Argument validation for the public builder

use crate::error::{Error, Result};

/// Ligature sequences that fonts commonly substitute with a single glyph.
///
/// A search key containing one of these cannot be matched reliably, since the
/// content stream may hold the ligature glyph instead of the separate letters.
pub const LIGATURES: &[&str] = &["ffi", "ffl", "ff", "fi", "fl"];

/// Return the first ligature found in `key`, if any
pub fn contains_ligature(key: &str) -> Option<&'static str> {
    LIGATURES.iter().copied().find(|ligature| key.contains(ligature))
}

/// Check that a search key is non-empty and free of ligatures
pub fn validate_search_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidSearchKey(
            "The search key must not be empty".to_string(),
        ));
    }

    if let Some(ligature) = contains_ligature(key) {
        return Err(Error::LigatureInSearchKey {
            key: key.to_string(),
            ligature: ligature.to_string(),
        });
    }

    Ok(())
}

/// Check that a numeric argument is at least `min`
pub fn require_at_least(name: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(Error::InvalidArgument(format!(
            "The {} must be at least {}, got {}",
            name, min, value
        )));
    }
    Ok(())
}
