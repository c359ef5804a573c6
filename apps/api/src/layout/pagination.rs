//! Page banding for the image export.
//!
//! The rendered résumé is one tall bitmap. It is cut into bands one page tall, top to bottom:
//! emit a page, subtract one page height from the remaining height, and keep going while the
//! remaining height is still `>= 0`. The last band may be partial (or empty when the bitmap
//! height is an exact multiple of the page height); it still produces a page.

use serde::Serialize;

/// A4 width used for the page-height ratio.
pub const PAGE_WIDTH_MM: u32 = 210;
/// Page height used for slicing. Slightly short of A4's 297 mm so bands never clip the
/// bottom margin of the printed page.
pub const PAGE_HEIGHT_MM: u32 = 295;

/// One page worth of the source bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageBand {
    /// Top of the band in source pixels.
    pub offset: u32,
    /// Rows taken from the source; `< page_height` for the final partial band.
    pub height: u32,
}

/// Band height in pixels for a bitmap `width_px` wide.
pub fn page_height_px(width_px: u32) -> u32 {
    let h = u64::from(width_px) * u64::from(PAGE_HEIGHT_MM) / u64::from(PAGE_WIDTH_MM);
    (h as u32).max(1)
}

/// Splits a bitmap of `image_height` rows into page bands of `page_height` rows.
pub fn plan_pages(image_height: u32, page_height: u32) -> Vec<PageBand> {
    let page_height = page_height.max(1);
    let mut bands = Vec::new();
    let mut offset: u32 = 0;
    let mut remaining = i64::from(image_height);

    loop {
        let height = image_height.saturating_sub(offset).min(page_height);
        bands.push(PageBand { offset, height });
        remaining -= i64::from(page_height);
        offset = offset.saturating_add(page_height);
        if remaining < 0 {
            break;
        }
    }
    bands
}
