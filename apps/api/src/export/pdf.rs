//! Paginated image export: one tall bitmap, cut into A4 bands, one JPEG per page.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, Rgb as Pixel, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::export::raster::{Rasterizer, UPSCALE};
use crate::export::{
    with_progress_reset, ExportArtifact, ExportError, ExportFormat, PROGRESS_DONE,
    PROGRESS_ENCODED, PROGRESS_PAGINATED, PROGRESS_RASTERIZED,
};
use crate::layout::{page_height_px, plan_pages, PageBand};
use crate::layout::pagination::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::render::RenderedDocument;

/// A4 in PDF points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

const JPEG_QUALITY: u8 = 90;

/// Rasterizes `doc`, slices it into pages and assembles the PDF.
pub fn export_pdf(
    doc: &RenderedDocument,
    full_name: &str,
    rasterizer: &dyn Rasterizer,
    progress: &mut dyn FnMut(u8),
) -> Result<ExportArtifact, ExportError> {
    with_progress_reset(progress, |progress| {
        let canvas = rasterizer.rasterize(doc, UPSCALE)?;
        progress(PROGRESS_RASTERIZED);

        let band_height = page_height_px(canvas.width());
        let bands = plan_pages(canvas.height(), band_height);
        debug!(
            width = canvas.width(),
            height = canvas.height(),
            pages = bands.len(),
            "Planned PDF pages"
        );
        progress(PROGRESS_PAGINATED);

        let background = Pixel(doc.style.background.channels());
        let pages = bands
            .iter()
            .map(|band| encode_band(&canvas, *band, band_height, background))
            .collect::<Result<Vec<_>, _>>()?;
        progress(PROGRESS_ENCODED);

        let bytes = assemble(&pages, canvas.width(), band_height)?;
        progress(PROGRESS_DONE);

        Ok(ExportArtifact::new(full_name, ExportFormat::Pdf, bytes))
    })
}

/// Copies one band onto a full page-height sheet of `background` and JPEG-encodes it.
fn encode_band(
    canvas: &RgbImage,
    band: PageBand,
    band_height: u32,
    background: Pixel<u8>,
) -> Result<Vec<u8>, ExportError> {
    let mut sheet = RgbImage::from_pixel(canvas.width(), band_height, background);
    if band.height > 0 {
        let slice = imageops::crop_imm(canvas, 0, band.offset, canvas.width(), band.height);
        imageops::replace(&mut sheet, &slice.to_image(), 0, 0);
    }

    let mut buf = Vec::new();
    sheet.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
    Ok(buf)
}

/// Builds a PDF with one page per JPEG, each placed full-width at the top of an A4 page.
fn assemble(pages: &[Vec<u8>], width_px: u32, height_px: u32) -> Result<Vec<u8>, ExportError> {
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let band_height_pt = PAGE_WIDTH_PT * PAGE_HEIGHT_MM as f32 / PAGE_WIDTH_MM as f32;
    let top = PAGE_HEIGHT_PT - band_height_pt;

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for jpeg in pages {
        let page_id = add_page(&mut pdf, pages_id, jpeg, width_px, height_px, band_height_pt, top)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(out)
}

fn add_page(
    pdf: &mut Document,
    pages_id: ObjectId,
    jpeg: &[u8],
    width_px: u32,
    height_px: u32,
    height_pt: f32,
    y: f32,
) -> Result<ObjectId, ExportError> {
    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width_px),
            "Height" => i64::from(height_px),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg.to_vec(),
    )
    .with_compression(false);
    let image_id = pdf.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    PAGE_WIDTH_PT.into(),
                    0.into(),
                    0.into(),
                    height_pt.into(),
                    0.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH_PT.into(), PAGE_HEIGHT_PT.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    }))
}
