use std::sync::OnceLock;

use quick_xml::escape::unescape;
use regex::Regex;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Tags that start a new line: paragraphs, divs, headings, list boundaries and `<br>`.
fn break_pattern() -> &'static Regex {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    BREAK.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*(?:p|div|br|h[1-6]|ul|ol|li)\b[^>]*>")
            .expect("break pattern is valid")
    })
}

fn list_item_pattern() -> &'static Regex {
    static ITEM: OnceLock<Regex> = OnceLock::new();
    ITEM.get_or_init(|| Regex::new(r"(?i)<\s*li\b[^>]*>").expect("list item pattern is valid"))
}

/// Strips inline markup by deleting everything between `<` and `>`, then trims.
///
/// This is literal delimiter removal, not HTML parsing: entities such as `&amp;` are left
/// as-is, a stray `<` without a closing `>` survives, and adjacent block tags can glue words
/// together (`a<br>b` → `ab`).
pub fn strip_markup(rich: &str) -> String {
    tag_pattern().replace_all(rich, "").trim().to_string()
}

/// Splits rich text into the lines it shows as: block tags and `<br>` end a line, list
/// items get a bullet, inline tags are dropped and HTML entities are decoded. Blank lines
/// are skipped.
pub fn rich_text_lines(rich: &str) -> Vec<String> {
    let bulleted = list_item_pattern().replace_all(rich, "\n\u{2022} ");
    let broken = break_pattern().replace_all(&bulleted, "\n");
    let plain = tag_pattern().replace_all(&broken, "");

    plain
        .lines()
        .filter_map(|line| {
            let decoded = unescape(line).unwrap_or(std::borrow::Cow::Borrowed(line));
            let line = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
            (!line.is_empty()).then_some(line)
        })
        .collect()
}
