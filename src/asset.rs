//! QR code and image placement specifications
//!
//! Positions are offsets in PDF units from the bottom-left corner of the page.
//! A negative offset is measured from the opposite edge instead, see
//! [`resolve_coordinate`](crate::layout::resolve_coordinate).

use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::qr::{ErrorCorrection, QrCodeRenderer};

/// Default edge length of a rendered QR code, in pixels
pub const DEFAULT_QR_SIZE: u32 = 125;

/// Describes a QR code to stamp onto the page
///
/// ```
/// use pdf_templater::{ErrorCorrection, QrSpec};
///
/// let spec = QrSpec::from_code("some-code")
///     .with_position(42, 7)
///     .with_size(233)
///     .without_margin()
///     .with_error_correction(ErrorCorrection::Low);
/// assert_eq!(spec.size(), 233);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QrSpec {
    code: String,
    x: i32,
    y: i32,
    size: u32,
    level: ErrorCorrection,
    margin: bool,
}

impl QrSpec {
    /// Create a spec with default position (0, 0), size 125, high error correction and margin
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            x: 0,
            y: 0,
            size: DEFAULT_QR_SIZE,
            level: ErrorCorrection::default(),
            margin: true,
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_position_x(mut self, x: i32) -> Self {
        self.x = x;
        self
    }

    pub fn with_position_y(mut self, y: i32) -> Self {
        self.y = y;
        self
    }

    /// Edge length of the rendered code in pixels
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrection) -> Self {
        self.level = level;
        self
    }

    /// Drop the quiet zone around the code
    pub fn without_margin(mut self) -> Self {
        self.margin = false;
        self
    }

    /// Keep the quiet zone around the code (the default)
    pub fn with_margin(mut self) -> Self {
        self.margin = true;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.level
    }

    pub fn has_margin(&self) -> bool {
        self.margin
    }

    /// Render this spec into raster bytes, consuming it
    pub fn render(self, renderer: &dyn QrCodeRenderer) -> Result<RenderedAsset> {
        let data = renderer.render(&self.code, self.size, self.level, self.margin)?;
        Ok(RenderedAsset {
            data,
            x: self.x,
            y: self.y,
        })
    }
}

/// Where the bytes of an image come from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// Describes a raster image (PNG or JPEG) to stamp onto the page at its natural size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    source: ImageSource,
    x: i32,
    y: i32,
}

impl ImageSpec {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            source: ImageSource::Bytes(data.into()),
            x: 0,
            y: 0,
        }
    }

    /// The file is read when the document is built
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ImageSource::Path(path.into()),
            x: 0,
            y: 0,
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_position_x(mut self, x: i32) -> Self {
        self.x = x;
        self
    }

    pub fn with_position_y(mut self, y: i32) -> Self {
        self.y = y;
        self
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Load the image bytes, consuming the spec
    pub fn render(self) -> Result<RenderedAsset> {
        let data = match self.source {
            ImageSource::Bytes(data) => data,
            ImageSource::Path(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound(path));
                }
                std::fs::read(&path)?
            }
        };
        Ok(RenderedAsset {
            data,
            x: self.x,
            y: self.y,
        })
    }
}

/// Any asset that can be queued for placement
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSpec {
    Qr(QrSpec),
    Image(ImageSpec),
}

impl AssetSpec {
    pub fn render(self, renderer: &dyn QrCodeRenderer) -> Result<RenderedAsset> {
        match self {
            AssetSpec::Qr(spec) => spec.render(renderer),
            AssetSpec::Image(spec) => spec.render(),
        }
    }
}

impl From<QrSpec> for AssetSpec {
    fn from(spec: QrSpec) -> Self {
        AssetSpec::Qr(spec)
    }
}

impl From<ImageSpec> for AssetSpec {
    fn from(spec: ImageSpec) -> Self {
        AssetSpec::Image(spec)
    }
}

/// Encoded raster bytes with the signed offsets they should be placed at
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAsset {
    pub data: Vec<u8>,
    pub x: i32,
    pub y: i32,
}
