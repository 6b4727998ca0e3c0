//! PDF manipulation module

pub mod content;
pub mod metadata;
pub mod place;
pub mod renderer;
pub mod replace;

// Re-export commonly used items
pub use content::{rewrite_tokens, shown_text, tokenize, untokenize, ContentToken, ShowText};
pub use metadata::{count_pages, extract_metadata, page_bounds, PdfMetadata};
pub use place::{place_assets, PlacedAsset};
pub use renderer::{LopdfRenderer, PdfRenderer};
pub use replace::replace_text;
