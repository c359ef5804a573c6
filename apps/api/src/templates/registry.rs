//! Static style table for the known résumé templates.
//!
//! Each template is one `TemplateStyle` row looked up once by id. Unknown ids resolve to
//! `DEFAULT_STYLE` instead of failing, so a stale or foreign `template_id` still renders.

use serde::Serialize;

use crate::models::template::Template;

// ────────────────────────────────────────────────────────────────────────────
// Style descriptor types
// ────────────────────────────────────────────────────────────────────────────

/// An sRGB colour. Serialized and emitted into CSS as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    Serif,
    Sans,
    Light,
    Medium,
    Mono,
}

impl FontFamily {
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Serif => "Georgia, 'Times New Roman', serif",
            FontFamily::Sans => "'Helvetica Neue', Arial, sans-serif",
            FontFamily::Light => "'Helvetica Neue Light', 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Medium => "'Helvetica Neue Medium', 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Mono => "'SFMono-Regular', Menlo, Consolas, monospace",
        }
    }
}

/// How the name/contact block is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderLayout {
    /// Left-aligned with a rule underneath.
    Underlined { rule: Rgb, thickness: u8 },
    /// Left-aligned with a vertical accent bar on the left edge.
    AccentBar { bar: Rgb, thickness: u8 },
    /// Centered text with a thin rule underneath.
    Centered { rule: Rgb },
    /// Full-width dark banner with light text.
    Banner { background: Rgb, name: Rgb, contact: Rgb },
    /// Bordered box on a tinted background.
    Boxed { border: Rgb, background: Rgb },
}

/// Decoration applied to every section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeadingDecoration {
    Plain,
    Underline { rule: Rgb },
    Band { background: Rgb },
    LeftRule { rule: Rgb },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadingStyle {
    pub color: Rgb,
    pub uppercase: bool,
    pub bold: bool,
    pub decoration: HeadingDecoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChipStyle {
    pub background: Rgb,
    pub text: Rgb,
}

/// The complete style bundle for one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateStyle {
    pub id: &'static str,
    pub font: FontFamily,
    pub background: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub header: HeaderLayout,
    pub heading: HeadingStyle,
    pub chip: ChipStyle,
}

// ────────────────────────────────────────────────────────────────────────────
// Palette
// ────────────────────────────────────────────────────────────────────────────

const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
const GRAY_50: Rgb = Rgb(0xf9, 0xfa, 0xfb);
const GRAY_100: Rgb = Rgb(0xf3, 0xf4, 0xf6);
const GRAY_200: Rgb = Rgb(0xe5, 0xe7, 0xeb);
const GRAY_300: Rgb = Rgb(0xd1, 0xd5, 0xdb);
const GRAY_400: Rgb = Rgb(0x9c, 0xa3, 0xaf);
const GRAY_600: Rgb = Rgb(0x4b, 0x55, 0x63);
const GRAY_700: Rgb = Rgb(0x37, 0x41, 0x51);
const GRAY_800: Rgb = Rgb(0x1f, 0x29, 0x37);
const GRAY_900: Rgb = Rgb(0x11, 0x18, 0x27);
const BLUE_100: Rgb = Rgb(0xdb, 0xea, 0xfe);
const BLUE_500: Rgb = Rgb(0x3b, 0x82, 0xf6);
const BLUE_600: Rgb = Rgb(0x25, 0x63, 0xeb);
const BLUE_800: Rgb = Rgb(0x1e, 0x40, 0xaf);
const ROSE_100: Rgb = Rgb(0xff, 0xe4, 0xe6);
const ROSE_600: Rgb = Rgb(0xe1, 0x1d, 0x48);
const ROSE_800: Rgb = Rgb(0x9f, 0x12, 0x39);
const STONE_50: Rgb = Rgb(0xfa, 0xfa, 0xf9);
const STONE_700: Rgb = Rgb(0x44, 0x40, 0x3c);
const STONE_800: Rgb = Rgb(0x29, 0x25, 0x24);

// ────────────────────────────────────────────────────────────────────────────
// Style table
// ────────────────────────────────────────────────────────────────────────────

/// Used for any id not in `STYLES`.
pub static DEFAULT_STYLE: TemplateStyle = TemplateStyle {
    id: "default",
    font: FontFamily::Sans,
    background: WHITE,
    text: GRAY_800,
    muted: GRAY_600,
    header: HeaderLayout::Underlined { rule: GRAY_600, thickness: 2 },
    heading: HeadingStyle {
        color: GRAY_800,
        uppercase: false,
        bold: true,
        decoration: HeadingDecoration::Plain,
    },
    chip: ChipStyle { background: GRAY_100, text: GRAY_700 },
};

#[rustfmt::skip]
static STYLES: [TemplateStyle; 7] = [
    // Classic Professional
    TemplateStyle {
        id: "template1",
        font: FontFamily::Serif,
        background: WHITE,
        text: GRAY_800,
        muted: GRAY_600,
        header: HeaderLayout::Underlined { rule: GRAY_800, thickness: 4 },
        heading: HeadingStyle { color: GRAY_800, uppercase: false, bold: true, decoration: HeadingDecoration::Underline { rule: GRAY_300 } },
        chip: ChipStyle { background: GRAY_100, text: GRAY_700 },
    },
    // Modern Creative
    TemplateStyle {
        id: "template2",
        font: FontFamily::Sans,
        background: WHITE,
        text: GRAY_900,
        muted: GRAY_600,
        header: HeaderLayout::AccentBar { bar: BLUE_500, thickness: 4 },
        heading: HeadingStyle { color: BLUE_600, uppercase: false, bold: true, decoration: HeadingDecoration::Plain },
        chip: ChipStyle { background: BLUE_100, text: BLUE_800 },
    },
    // Minimalist Clean
    TemplateStyle {
        id: "template3",
        font: FontFamily::Light,
        background: GRAY_50,
        text: GRAY_800,
        muted: GRAY_600,
        header: HeaderLayout::Centered { rule: GRAY_300 },
        heading: HeadingStyle { color: GRAY_700, uppercase: true, bold: false, decoration: HeadingDecoration::Plain },
        chip: ChipStyle { background: GRAY_100, text: GRAY_700 },
    },
    // Executive Elite
    TemplateStyle {
        id: "template4",
        font: FontFamily::Medium,
        background: WHITE,
        text: GRAY_900,
        muted: GRAY_600,
        header: HeaderLayout::Banner { background: GRAY_900, name: WHITE, contact: GRAY_200 },
        heading: HeadingStyle { color: GRAY_900, uppercase: false, bold: true, decoration: HeadingDecoration::Band { background: GRAY_100 } },
        chip: ChipStyle { background: GRAY_200, text: GRAY_800 },
    },
    // Tech Focus
    TemplateStyle {
        id: "template5",
        font: FontFamily::Mono,
        background: WHITE,
        text: GRAY_800,
        muted: GRAY_600,
        header: HeaderLayout::Boxed { border: GRAY_400, background: GRAY_100 },
        heading: HeadingStyle { color: GRAY_800, uppercase: false, bold: true, decoration: HeadingDecoration::LeftRule { rule: GRAY_600 } },
        chip: ChipStyle { background: GRAY_100, text: GRAY_700 },
    },
    // Creative Bold
    TemplateStyle {
        id: "template6",
        font: FontFamily::Sans,
        background: WHITE,
        text: GRAY_900,
        muted: GRAY_600,
        header: HeaderLayout::Banner { background: ROSE_600, name: WHITE, contact: ROSE_100 },
        heading: HeadingStyle { color: ROSE_600, uppercase: true, bold: true, decoration: HeadingDecoration::LeftRule { rule: ROSE_600 } },
        chip: ChipStyle { background: ROSE_100, text: ROSE_800 },
    },
    // Academic Scholar
    TemplateStyle {
        id: "template7",
        font: FontFamily::Serif,
        background: STONE_50,
        text: STONE_800,
        muted: STONE_700,
        header: HeaderLayout::Centered { rule: STONE_700 },
        heading: HeadingStyle { color: STONE_800, uppercase: true, bold: true, decoration: HeadingDecoration::Underline { rule: STONE_700 } },
        chip: ChipStyle { background: GRAY_100, text: STONE_800 },
    },
];

/// Catalog metadata, index-aligned with `STYLES`.
const CATALOG: [(&str, &str, &str); 7] = [
    (
        "Classic Professional",
        "Clean and professional layout perfect for corporate roles",
        "https://images.unsplash.com/photo-1586281380349-632531db7ed4?w=300&h=400&fit=crop",
    ),
    (
        "Modern Creative",
        "Contemporary design with subtle color accents",
        "https://images.unsplash.com/photo-1434030216411-0b793f4b4173?w=300&h=400&fit=crop",
    ),
    (
        "Minimalist Clean",
        "Simple and elegant design focused on content",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=400&fit=crop",
    ),
    (
        "Executive Elite",
        "Sophisticated layout for senior positions",
        "https://images.unsplash.com/photo-1521791136064-7986c2920216?w=300&h=400&fit=crop",
    ),
    (
        "Tech Focus",
        "Perfect for developers and tech professionals",
        "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=300&h=400&fit=crop",
    ),
    (
        "Creative Bold",
        "Eye-catching design for creative industries",
        "https://images.unsplash.com/photo-1552664730-d307ca884978?w=300&h=400&fit=crop",
    ),
    (
        "Academic Scholar",
        "Traditional format ideal for academic positions",
        "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=300&h=400&fit=crop",
    ),
];

// ────────────────────────────────────────────────────────────────────────────
// Lookup
// ────────────────────────────────────────────────────────────────────────────

/// The built-in catalog, in display order. The first entry is the default template.
pub fn list() -> Vec<Template> {
    STYLES
        .iter()
        .zip(CATALOG.iter())
        .map(|(style, (name, description, preview))| Template {
            id: style.id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            preview_image: preview.to_string(),
        })
        .collect()
}

/// Returns the style row for `template_id`, or `DEFAULT_STYLE` if the id is unknown.
pub fn resolve(template_id: &str) -> &'static TemplateStyle {
    STYLES
        .iter()
        .find(|s| s.id == template_id)
        .unwrap_or(&DEFAULT_STYLE)
}

pub fn is_known(template_id: &str) -> bool {
    STYLES.iter().any(|s| s.id == template_id)
}

/// Ids of every known template, in catalog order.
#[cfg(test)]
pub fn known_ids() -> impl Iterator<Item = &'static str> {
    STYLES.iter().map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::DEFAULT_TEMPLATE_ID;

    #[test]
    fn test_catalog_has_seven_templates_in_order() {
        let catalog = list();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog[0].id, "template1");
        assert_eq!(catalog[0].name, "Classic Professional");
        assert_eq!(catalog[6].id, "template7");
    }

    #[test]
    fn test_default_template_is_first_catalog_entry() {
        assert_eq!(list()[0].id, DEFAULT_TEMPLATE_ID);
    }

    #[test]
    fn test_resolve_known_ids() {
        for id in known_ids() {
            assert_eq!(resolve(id).id, id);
            assert!(is_known(id));
        }
        assert_eq!(resolve("template5").font, FontFamily::Mono);
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        assert_eq!(resolve("template99"), &DEFAULT_STYLE);
        assert_eq!(resolve(""), &DEFAULT_STYLE);
        assert!(!is_known("template99"));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: Vec<_> = known_ids().collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn test_rgb_css_hex() {
        assert_eq!(Rgb(0x3b, 0x82, 0xf6).css(), "#3b82f6");
        assert_eq!(serde_json::to_value(WHITE).unwrap(), "#ffffff");
    }
}
