//! Bitmap glyph metrics and greedy word-wrap for the rasterizer.
//!
//! Glyphs come from the 8×8 `font8x8` tables, so every character has the same advance.
//! A text role picks an integer glyph multiplier; the export upscale factor multiplies on
//! top of that. All widths here are in device pixels.
//!
//! Text is passed through [`printable`] before it is measured, so a character without a
//! bitmap is folded to a close ASCII spelling first and only falls back to '?' after that.

use std::borrow::Cow;

use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS,
    LATIN_FONTS, MISC_FONTS,
};

/// Edge length of one unscaled glyph cell.
pub const GLYPH_CELL: u32 = 8;

/// What a run of text is, which decides its size and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Name,
    Heading,
    Title,
    Body,
    Small,
}

impl TextRole {
    fn glyph_multiplier(&self) -> u32 {
        match self {
            TextRole::Name => 3,
            TextRole::Heading => 2,
            TextRole::Title | TextRole::Body | TextRole::Small => 1,
        }
    }

    /// Extra vertical space between wrapped lines, in unscaled pixels.
    fn leading(&self) -> u32 {
        match self {
            TextRole::Name => 8,
            TextRole::Heading => 6,
            TextRole::Title => 5,
            TextRole::Body => 5,
            TextRole::Small => 4,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, TextRole::Name | TextRole::Heading | TextRole::Title)
    }
}

/// Sizes for one text role at one upscale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Device pixels per glyph bit.
    pub pixel: u32,
    pub advance: u32,
    pub line_height: u32,
}

impl FontMetrics {
    pub fn new(role: TextRole, upscale: u32) -> Self {
        let pixel = role.glyph_multiplier() * upscale.max(1);
        Self {
            pixel,
            advance: GLYPH_CELL * pixel,
            line_height: GLYPH_CELL * pixel + role.leading() * upscale.max(1),
        }
    }

    /// Width of a single-line string in device pixels, after folding.
    pub fn measure_str(&self, s: &str) -> u32 {
        printable(s).chars().count() as u32 * self.advance
    }

    /// Greedy word-wrap at `max_width`. Words wider than a full line are split across lines.
    /// Empty or whitespace-only text yields no lines.
    pub fn wrap(&self, text: &str, max_width: u32) -> Vec<String> {
        let text = printable(text);
        let max_chars = (max_width / self.advance).max(1) as usize;
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in text.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-break words that cannot fit on any line.
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let space = usize::from(current_len > 0);
            if current_len + space + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            } else if space == 1 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        if current_len > 0 {
            lines.push(current);
        }
        lines
    }
}

/// The 8×8 bitmap for `c`, if one of the font tables has it. Row `r` bit `b` set means the
/// pixel at column `b` is inked.
fn bitmap(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| HIRAGANA_FONTS.get(c))
        .or_else(|| MISC_FONTS.get(c))
}

/// The bitmap for `c`, or the one for '?' when no table covers it.
pub fn glyph(c: char) -> [u8; 8] {
    bitmap(c).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8])
}

/// Base letters for U+0100..=U+017F (Latin Extended-A), one per code point.
const LATIN_EXTENDED_A: &str = concat!(
    "AaAaAa", "CcCcCcCc", "DdDd", "EeEeEeEeEe", "GgGgGgGg", "HhHh", "IiIiIiIiIi", "Ii", "Jj",
    "Kkk", "LlLlLlLlLl", "NnNnNnnNn", "OoOoOo", "Oo", "RrRrRr", "SsSsSsSs", "TtTtTt",
    "UuUuUuUuUuUu", "Ww", "YyY", "ZzZzZz", "s",
);

/// Russian and Ukrainian Cyrillic, transliterated.
fn cyrillic(c: char) -> Option<&'static str> {
    const UPPER: [&str; 32] = [
        "A", "B", "V", "G", "D", "E", "Zh", "Z", "I", "Y", "K", "L", "M", "N", "O", "P", "R",
        "S", "T", "U", "F", "Kh", "Ts", "Ch", "Sh", "Shch", "", "Y", "", "E", "Yu", "Ya",
    ];
    const LOWER: [&str; 32] = [
        "a", "b", "v", "g", "d", "e", "zh", "z", "i", "y", "k", "l", "m", "n", "o", "p", "r",
        "s", "t", "u", "f", "kh", "ts", "ch", "sh", "shch", "", "y", "", "e", "yu", "ya",
    ];
    match c {
        '\u{0410}'..='\u{042F}' => Some(UPPER[c as usize - 0x0410]),
        '\u{0430}'..='\u{044F}' => Some(LOWER[c as usize - 0x0430]),
        '\u{0401}' => Some("Yo"),
        '\u{0451}' => Some("yo"),
        '\u{0404}' => Some("Ye"),
        '\u{0454}' => Some("ye"),
        '\u{0406}' => Some("I"),
        '\u{0456}' => Some("i"),
        '\u{0407}' => Some("Yi"),
        '\u{0457}' => Some("yi"),
        '\u{0490}' => Some("G"),
        '\u{0491}' => Some("g"),
        _ => None,
    }
}

/// A close spelling for a character that has no bitmap of its own.
fn fold(c: char) -> Option<Cow<'static, str>> {
    let folded = match c {
        '\u{0132}' => "IJ",
        '\u{0133}' => "ij",
        '\u{0152}' => "OE",
        '\u{0153}' => "oe",
        '\u{0100}'..='\u{017F}' => {
            let base = LATIN_EXTENDED_A.chars().nth(c as usize - 0x0100)?;
            return Some(Cow::Owned(base.to_string()));
        }
        '\u{0218}' => "S",
        '\u{0219}' => "s",
        '\u{021A}' => "T",
        '\u{021B}' => "t",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '\u{2022}' | '\u{2023}' | '\u{2043}' | '\u{25E6}' | '\u{2219}' => "\u{b7}",
        '\u{2026}' => "...",
        '\u{2039}' => "<",
        '\u{203A}' => ">",
        '\u{20AC}' => "EUR",
        '\u{2122}' => "TM",
        '\u{2002}'..='\u{200A}' | '\u{202F}' | '\u{205F}' => " ",
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' => "",
        _ => cyrillic(c)?,
    };
    Some(Cow::Borrowed(folded))
}

/// `text` with every character the font tables cannot draw replaced by a folded spelling,
/// or '?' when there is none.
pub fn printable(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| bitmap(c).is_some()) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if bitmap(c).is_some() {
            out.push(c);
        } else if let Some(folded) = fold(c) {
            out.push_str(&folded);
        } else {
            out.push('?');
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> FontMetrics {
        FontMetrics::new(TextRole::Body, 1)
    }

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(body().measure_str(""), 0);
    }

    #[test]
    fn test_measure_str_counts_chars_not_bytes() {
        assert_eq!(body().measure_str("Rust"), 32);
        assert_eq!(body().measure_str("é"), 8);
    }

    #[test]
    fn test_upscale_multiplies_metrics() {
        let m = FontMetrics::new(TextRole::Heading, 2);
        assert_eq!(m.pixel, 4);
        assert_eq!(m.advance, 32);
        assert_eq!(m.line_height, 32 + 12);
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        assert_eq!(body().wrap("Hello world", 800), vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_breaks_at_word_boundaries() {
        // 10 chars per line.
        let lines = body().wrap("alpha beta gamma delta", 80);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn test_wrap_hard_breaks_overlong_words() {
        let lines = body().wrap("ab abcdefghijkl", 40);
        assert_eq!(lines, vec!["ab", "abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        assert!(body().wrap("   ", 80).is_empty());
    }

    #[test]
    fn test_glyph_fallback_for_unknown_char() {
        assert_eq!(glyph('\u{1F600}'), glyph('?'));
        assert_ne!(glyph('A'), [0; 8]);
        assert_eq!(glyph(' '), [0; 8]);
    }

    #[test]
    fn test_glyph_covers_greek_and_box_tables() {
        assert_ne!(glyph('Ω'), glyph('?'));
        assert_ne!(glyph('\u{2500}'), glyph('?'));
    }

    #[test]
    fn test_latin_extended_names_fold_to_base_letters() {
        assert_eq!(printable("Łukasz Dvořák"), "Lukasz Dvorák");
        assert_eq!(printable("Erdős Zoë"), "Erdos Zoë");
        assert_eq!(printable("Ștefan Œuvre"), "Stefan OEuvre");
    }

    #[test]
    fn test_cyrillic_is_transliterated() {
        assert_eq!(printable("Жанна Щукина"), "Zhanna Shchukina");
    }

    #[test]
    fn test_typographic_punctuation_folds() {
        assert_eq!(
            printable("It\u{2019}s \u{201C}ok\u{201D} \u{2014} \u{2022} done\u{2026}"),
            "It's \"ok\" - \u{b7} done..."
        );
    }

    #[test]
    fn test_printable_borrows_when_nothing_to_fold() {
        assert!(matches!(printable("Zoë Smith"), Cow::Borrowed(_)));
        assert_eq!(printable("李"), "?");
    }

    #[test]
    fn test_measure_str_uses_folded_width() {
        assert_eq!(body().measure_str("Щ"), 4 * 8);
        assert_eq!(body().wrap("Ж", 800), vec!["Zh"]);
    }
}
