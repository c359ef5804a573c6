//! Rasterizer: paints a `RenderedDocument` onto a single tall RGB bitmap.
//!
//! Layout runs first and produces a display list (`DrawOp`s with absolute positions), which
//! also fixes the canvas height. Painting then replays the list in order, so backgrounds
//! must be pushed before the text that sits on them.

use image::{Rgb as Pixel, RgbImage};

use crate::export::plain_text::rich_text_lines;
use crate::export::ExportError;
use crate::layout::font_metrics::{glyph, printable, FontMetrics, TextRole};
use crate::render::{Entry, HeaderBlock, RenderedDocument, RenderedSection, SectionBody};
use crate::templates::{HeaderLayout, HeadingDecoration, Rgb, TemplateStyle};

/// Canvas width in CSS pixels before upscaling (matches the HTML preview's max width).
pub const CANVAS_WIDTH: u32 = 672;
/// Fixed upscale factor for exports.
pub const UPSCALE: u32 = 2;
const PADDING: u32 = 32;
/// Upper bound on canvas height, in device pixels.
const MAX_CANVAS_HEIGHT: u32 = 200_000;

/// Turns a rendered visual into a bitmap.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, doc: &RenderedDocument, upscale: u32) -> Result<RgbImage, ExportError>;
}

/// Built-in rasterizer using 8×8 bitmap glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(&self, doc: &RenderedDocument, upscale: u32) -> Result<RgbImage, ExportError> {
        let list = layout(doc, upscale.max(1));
        if list.height > MAX_CANVAS_HEIGHT {
            return Err(ExportError::Raster(format!(
                "document is too tall to rasterize ({} px)",
                list.height
            )));
        }
        Ok(paint(&list, doc.style.background))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: Rgb,
    },
    Text {
        x: u32,
        y: u32,
        text: String,
        role: TextRole,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

/// Mutable layout cursor. All values are device pixels.
struct Cursor {
    scale: u32,
    width: u32,
    left: u32,
    right: u32,
    y: u32,
    ops: Vec<DrawOp>,
}

impl Cursor {
    fn px(&self, css: u32) -> u32 {
        css * self.scale
    }

    fn content_width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    fn metrics(&self, role: TextRole) -> FontMetrics {
        FontMetrics::new(role, self.scale)
    }

    fn rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    /// Wraps `text` into the content box starting at `x`, advancing `y`.
    fn paragraph(&mut self, text: &str, role: TextRole, color: Rgb, x: u32) {
        let metrics = self.metrics(role);
        let max_width = self.right.saturating_sub(x);
        for line in metrics.wrap(text, max_width) {
            self.ops.push(DrawOp::Text {
                x,
                y: self.y,
                text: line,
                role,
                color,
            });
            self.y += metrics.line_height;
        }
    }

    /// One paragraph per line of rich text.
    fn rich(&mut self, html: &str, color: Rgb, x: u32) {
        for line in rich_text_lines(html) {
            self.paragraph(&line, TextRole::Body, color, x);
        }
    }

    fn centered(&mut self, text: &str, role: TextRole, color: Rgb) {
        let metrics = self.metrics(role);
        for line in metrics.wrap(text, self.content_width()) {
            let slack = self.content_width().saturating_sub(metrics.measure_str(&line));
            self.ops.push(DrawOp::Text {
                x: self.left + slack / 2,
                y: self.y,
                text: line,
                role,
                color,
            });
            self.y += metrics.line_height;
        }
    }
}

/// Lays the document out without painting it.
pub fn layout(doc: &RenderedDocument, upscale: u32) -> DisplayList {
    let style = doc.style;
    let scale = upscale.max(1);
    let width = CANVAS_WIDTH * scale;
    let mut cur = Cursor {
        scale,
        width,
        left: PADDING * scale,
        right: width - PADDING * scale,
        y: PADDING * scale,
        ops: Vec::new(),
    };

    layout_header(&mut cur, &doc.header, style);
    for section in &doc.sections {
        layout_section(&mut cur, section, style);
    }

    let height = cur.y + cur.px(PADDING);
    DisplayList {
        width,
        height,
        ops: cur.ops,
    }
}

fn header_lines(cur: &mut Cursor, header: &HeaderBlock, name: Rgb, contact: Rgb, x: u32) {
    cur.paragraph(&header.name, TextRole::Name, name, x);
    cur.y += cur.px(4);
    for c in &header.contacts {
        cur.paragraph(&c.value, TextRole::Small, contact, x);
    }
}

fn layout_header(cur: &mut Cursor, header: &HeaderBlock, style: &TemplateStyle) {
    let top = cur.y;
    let left = cur.left;
    match style.header {
        HeaderLayout::Underlined { rule, thickness } => {
            header_lines(cur, header, style.text, style.muted, left);
            cur.y += cur.px(16);
            let (y, w, h) = (cur.y, cur.content_width(), cur.px(u32::from(thickness)));
            cur.rect(left, y, w, h, rule);
            cur.y += h;
        }
        HeaderLayout::AccentBar { bar, thickness } => {
            let bar_w = cur.px(u32::from(thickness));
            let x = left + bar_w + cur.px(16);
            header_lines(cur, header, style.text, style.muted, x);
            let h = cur.y - top;
            cur.rect(left, top, bar_w, h, bar);
        }
        HeaderLayout::Centered { rule } => {
            cur.centered(&header.name, TextRole::Name, style.text);
            cur.y += cur.px(4);
            for c in &header.contacts {
                cur.centered(&c.value, TextRole::Small, style.muted);
            }
            cur.y += cur.px(24);
            let (y, w, h) = (cur.y, cur.content_width(), cur.px(1));
            cur.rect(left, y, w, h, rule);
            cur.y += h;
        }
        HeaderLayout::Banner {
            background,
            name,
            contact,
        } => {
            // Bleeds to the canvas edges, covering the top padding.
            let start = cur.ops.len();
            let inset = cur.px(24);
            cur.y = inset;
            header_lines(cur, header, name, contact, inset);
            cur.y += cur.px(24);
            let banner = DrawOp::Rect {
                x: 0,
                y: 0,
                w: cur.width,
                h: cur.y,
                color: background,
            };
            cur.ops.insert(start, banner);
        }
        HeaderLayout::Boxed { border, background } => {
            let start = cur.ops.len();
            let inset = cur.px(16);
            cur.y += inset;
            header_lines(cur, header, style.text, style.muted, left + inset);
            cur.y += cur.px(16);
            let (w, h, t) = (cur.content_width(), cur.y - top, cur.px(1));
            let frame = [
                DrawOp::Rect { x: left, y: top, w, h, color: background },
                DrawOp::Rect { x: left, y: top, w, h: t, color: border },
                DrawOp::Rect { x: left, y: top + h - t, w, h: t, color: border },
                DrawOp::Rect { x: left, y: top, w: t, h, color: border },
                DrawOp::Rect { x: left + w - t, y: top, w: t, h, color: border },
            ];
            for (i, op) in frame.into_iter().enumerate() {
                cur.ops.insert(start + i, op);
            }
        }
    }
    cur.y += cur.px(24);
}

fn layout_section(cur: &mut Cursor, section: &RenderedSection, style: &TemplateStyle) {
    let heading = &style.heading;
    let text = if heading.uppercase {
        section.heading.to_uppercase()
    } else {
        section.heading.to_string()
    };
    let left = cur.left;
    let top = cur.y;
    let start = cur.ops.len();

    match heading.decoration {
        HeadingDecoration::Plain => cur.paragraph(&text, TextRole::Heading, heading.color, left),
        HeadingDecoration::Underline { rule } => {
            cur.paragraph(&text, TextRole::Heading, heading.color, left);
            let (y, w, h) = (cur.y, cur.content_width(), cur.px(1));
            cur.rect(left, y, w, h, rule);
            cur.y += h;
        }
        HeadingDecoration::Band { background } => {
            let inset = cur.px(12);
            cur.y += cur.px(4);
            cur.paragraph(&text, TextRole::Heading, heading.color, left + inset);
            cur.y += cur.px(4);
            let band = DrawOp::Rect {
                x: left,
                y: top,
                w: cur.content_width(),
                h: cur.y - top,
                color: background,
            };
            cur.ops.insert(start, band);
        }
        HeadingDecoration::LeftRule { rule } => {
            let inset = cur.px(8);
            cur.paragraph(&text, TextRole::Heading, heading.color, left + inset);
            let (w, h) = (cur.px(2), cur.y - top);
            cur.rect(left, top, w, h, rule);
        }
    }
    cur.y += cur.px(12);

    match &section.body {
        SectionBody::Prose(rich) => cur.rich(&rich.0, style.text, left),
        SectionBody::Chips(chips) => layout_chips(cur, chips, style),
        SectionBody::Entries(entries) => {
            for entry in entries {
                layout_entry(cur, entry, style);
                cur.y += cur.px(16);
            }
        }
    }
    cur.y += cur.px(24);
}

/// Chips flow left to right and wrap to a new row at the right edge. A chip wider than the
/// content box wraps its own text onto several lines.
fn layout_chips(cur: &mut Cursor, chips: &[String], style: &TemplateStyle) {
    let metrics = cur.metrics(TextRole::Small);
    let pad_x = cur.px(12);
    let pad_y = cur.px(4);
    let gap = cur.px(8);
    let text_width = cur.content_width().saturating_sub(2 * pad_x);
    let mut x = cur.left;
    let mut row_h = 0;

    for chip in chips {
        let lines = metrics.wrap(chip, text_width);
        let Some(widest) = lines.iter().map(|l| metrics.measure_str(l)).max() else {
            continue;
        };
        let chip_w = widest + 2 * pad_x;
        let chip_h = metrics.advance + (lines.len() as u32 - 1) * metrics.line_height + 2 * pad_y;
        if x > cur.left && x + chip_w > cur.right {
            x = cur.left;
            cur.y += row_h + gap;
            row_h = 0;
        }
        let y = cur.y;
        cur.rect(x, y, chip_w, chip_h, style.chip.background);
        for (i, line) in lines.into_iter().enumerate() {
            cur.ops.push(DrawOp::Text {
                x: x + pad_x,
                y: y + pad_y + i as u32 * metrics.line_height,
                text: line,
                role: TextRole::Small,
                color: style.chip.text,
            });
        }
        row_h = row_h.max(chip_h);
        x += chip_w + gap;
    }
    cur.y += row_h;
}

fn layout_entry(cur: &mut Cursor, entry: &Entry, style: &TemplateStyle) {
    let left = cur.left;
    let title_metrics = cur.metrics(TextRole::Title);
    let small = cur.metrics(TextRole::Small);

    // Dates sit right-aligned on the title's first line.
    let dates = entry.dates.as_deref().map(|d| printable(d).into_owned());
    let dates_w = dates.as_deref().map_or(0, |d| small.measure_str(d));
    if let Some(dates) = dates {
        let x = cur.right.saturating_sub(dates_w);
        cur.ops.push(DrawOp::Text {
            x,
            y: cur.y,
            text: dates,
            role: TextRole::Small,
            color: style.muted,
        });
    }
    let title = if entry.featured {
        format!("{} *", entry.title)
    } else {
        entry.title.clone()
    };
    let title_width = cur
        .content_width()
        .saturating_sub(dates_w + cur.px(16))
        .max(title_metrics.advance);
    let lines = title_metrics.wrap(&title, title_width);
    if lines.is_empty() {
        cur.y += title_metrics.line_height;
    }
    for line in lines {
        cur.ops.push(DrawOp::Text {
            x: left,
            y: cur.y,
            text: line,
            role: TextRole::Title,
            color: style.text,
        });
        cur.y += title_metrics.line_height;
    }

    if !entry.subtitle.is_empty() {
        cur.paragraph(&entry.subtitle.join(" \u{b7} "), TextRole::Small, style.muted, left);
    }
    if let Some(body) = &entry.body {
        cur.y += cur.px(4);
        cur.rich(&body.0, style.text, left);
    }
    for (label, value) in &entry.details {
        cur.paragraph(&format!("{label}: {value}"), TextRole::Small, style.muted, left);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Painting
// ────────────────────────────────────────────────────────────────────────────

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel(color.channels())
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Pixel<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn paint(list: &DisplayList, background: Rgb) -> RgbImage {
    let mut img = RgbImage::from_pixel(list.width, list.height.max(1), pixel(background));
    let scale = list.width / CANVAS_WIDTH;
    for op in &list.ops {
        match op {
            DrawOp::Rect { x, y, w, h, color } => fill(&mut img, *x, *y, *w, *h, pixel(*color)),
            DrawOp::Text {
                x,
                y,
                text,
                role,
                color,
            } => {
                let metrics = FontMetrics::new(*role, scale);
                paint_text(&mut img, *x, *y, text, metrics, role.is_bold(), *color)
            }
        }
    }
    img
}

fn paint_text(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    text: &str,
    metrics: FontMetrics,
    bold: bool,
    color: Rgb,
) {
    let ink = pixel(color);
    let p = metrics.pixel;
    let embolden = if bold { (p / 2).max(1) } else { 0 };
    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * metrics.advance;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..8u32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let gx = origin_x + col * p;
                let gy = y + row as u32 * p;
                fill(img, gx, gy, p + embolden, p, ink);
            }
        }
    }
}
