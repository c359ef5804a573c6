// Raster layout helpers for the image export.
// Glyph metrics + word-wrap for painting text, and page banding for slicing the result.

pub mod font_metrics;
pub mod pagination;

pub use pagination::{page_height_px, plan_pages, PageBand};
