//! Page bounds and placement coordinate calculations

/// Page size in PDF units (1/72 inch), origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBounds {
    pub width: f32,
    pub height: f32,
}

impl PageBounds {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
        }
    }

    /// Bounds of a `[llx lly urx ury]` rectangle
    pub fn from_rect(rect: [f32; 4]) -> Self {
        Self {
            width: (rect[2] - rect[0]).abs(),
            height: (rect[3] - rect[1]).abs(),
        }
    }
}

/// Resolve a signed placement offset into an absolute page coordinate
///
/// A non-negative offset is measured from the page origin. A negative offset
/// is a margin from the far edge: the asset's far edge ends up `|offset|`
/// units inside `page_bound`.
///
/// `page_bound` must be finite.
pub fn resolve_coordinate(offset: i32, page_bound: f32, asset_size: f32) -> f32 {
    if offset < 0 {
        page_bound - (offset.unsigned_abs() as f32 + asset_size)
    } else {
        offset as f32
    }
}
