//! QR code rendering
//!
//! Codes are encoded with the `qrcode` crate and rasterised into a square PNG
//! with the `image` crate.

use std::io::Cursor;
use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use crate::error::{Error, Result};

/// Largest accepted edge length of a rendered code, in pixels
pub const MAX_QR_SIZE: u32 = 4096;

/// QR error correction levels and their approximate recovery capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% of codewords can be restored
    Low,
    /// ~15%
    Medium,
    /// ~25%
    Quartile,
    /// ~30%
    #[default]
    High,
}

impl ErrorCorrection {
    /// Approximate percentage of recoverable codewords
    pub fn percent(self) -> u8 {
        match self {
            ErrorCorrection::Low => 7,
            ErrorCorrection::Medium => 15,
            ErrorCorrection::Quartile => 25,
            ErrorCorrection::High => 30,
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Renders QR codes into raster image bytes
pub trait QrCodeRenderer {
    /// Render `code` as a square image of `size` pixels
    ///
    /// When `margin` is off the quiet zone around the code is dropped.
    fn render(&self, code: &str, size: u32, level: ErrorCorrection, margin: bool) -> Result<Vec<u8>>;
}

/// Default renderer producing PNG images
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeRenderer;

impl QrCodeRenderer for QrcodeRenderer {
    fn render(&self, code: &str, size: u32, level: ErrorCorrection, margin: bool) -> Result<Vec<u8>> {
        if size > MAX_QR_SIZE {
            return Err(Error::render(
                format!("QR-code render failed for {:?}", code),
                format!("size of {} px exceeds the maximum of {} px", size, MAX_QR_SIZE),
            ));
        }

        let qr = QrCode::with_error_correction_level(code.as_bytes(), level.ec_level())
            .map_err(|e| Error::render(format!("QR-code render failed for {:?}", code), e))?;

        let image = rasterize(&qr, size, margin);

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| Error::render("QR-code PNG encoding failed", e))?;

        log::debug!(
            "Rendered QR code with {} modules at {} px ({}% correction)",
            qr.width(),
            size,
            level.percent()
        );

        Ok(png)
    }
}

/// Render the code at the largest whole module scale that fits `size`, centred on a white square
///
/// The image is `size` pixels wide unless the code needs more than one pixel
/// per module beyond that, in which case it grows to one pixel per module.
fn rasterize(qr: &QrCode, size: u32, margin: bool) -> GrayImage {
    let code = qr
        .render::<Luma<u8>>()
        .light_color(Luma([255u8]))
        .dark_color(Luma([0u8]))
        .quiet_zone(margin)
        .max_dimensions(size, size)
        .build();

    let dimension = size.max(code.width());
    if dimension == code.width() {
        return code;
    }

    let mut image = GrayImage::from_pixel(dimension, dimension, Luma([255u8]));
    let offset = i64::from((dimension - code.width()) / 2);
    imageops::overlay(&mut image, &code, offset, offset);
    image
}
