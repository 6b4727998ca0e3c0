//! PDF Templater Library
//!
//! Fill PDF templates with data. This library provides functionality to:
//! - Search and replace text in the content streams of every page
//! - Spread long text over several single-line placeholders
//! - Stamp QR codes and raster images onto single page documents
//! - Extract metadata (page counts, page size, etc.)
//!
//! # Example
//!
//! ```no_run
//! use pdf_templater::{FillMode, ImageSpec, PdfBuilder, QrSpec};
//!
//! PdfBuilder::from_path("template.pdf")
//!     .with_replacement("@name@", "Jane Doe")
//!     .with_multiline_replacement_mode(
//!         "Lucy in the sky with diamonds",
//!         20,
//!         FillMode::Top,
//!         ["@line0@", "@line1@"],
//!     )
//!     .with_qr_code(QrSpec::from_code("4711").with_position(-20, -20))
//!     .with_image(ImageSpec::from_path("logo.png").with_position(20, -20))
//!     .build()
//!     .expect("Failed to build document")
//!     .save("result.pdf")
//!     .expect("Failed to save document");
//! ```

pub mod asset;
pub mod builder;
pub mod error;
pub mod layout;
pub mod multiline;
pub mod pdf;
pub mod qr;
pub mod substitute;
pub mod validate;

// Re-export commonly used items
pub use asset::{AssetSpec, ImageSource, ImageSpec, QrSpec, RenderedAsset};
pub use builder::{BuildablePdf, MultiLineRequest, PdfBuilder, PdfDocument, TemplateSource};
pub use error::{Error, Result};
pub use layout::{resolve_coordinate, PageBounds};
pub use multiline::{distribute, FillMode};
pub use qr::{ErrorCorrection, QrCodeRenderer, QrcodeRenderer};
pub use substitute::{substitute, ReplacementSet};
