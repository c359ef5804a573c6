//! HTML preview of a `RenderedDocument`, styled inline from the template row.
//!
//! Plain fields are escaped; rich-text fields are inserted verbatim so their markup displays
//! as formatting.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::render::document::{Entry, HeaderBlock, RenderedDocument, RenderedSection, SectionBody};
use crate::templates::{HeaderLayout, HeadingDecoration, TemplateStyle};

impl RenderedDocument {
    pub fn to_html(&self) -> String {
        let style = self.style;
        let mut out = String::with_capacity(4096);

        let _ = write!(
            out,
            r#"<div class="resume resume-{id}" style="max-width:672px;margin:0 auto;padding:32px;background:{bg};color:{fg};font-family:{font};">"#,
            id = style.id,
            bg = style.background.css(),
            fg = style.text.css(),
            font = style.font.css_stack(),
        );
        write_header(&mut out, &self.header, style);
        for section in &self.sections {
            write_section(&mut out, section, style);
        }
        out.push_str("</div>");
        out
    }
}

fn header_container_css(style: &TemplateStyle) -> String {
    match style.header {
        HeaderLayout::Underlined { rule, thickness } => {
            format!("border-bottom:{thickness}px solid {};padding-bottom:16px;", rule.css())
        }
        HeaderLayout::AccentBar { bar, thickness } => {
            format!("border-left:{thickness}px solid {};padding-left:16px;", bar.css())
        }
        HeaderLayout::Centered { rule } => {
            format!("text-align:center;border-bottom:1px solid {};padding-bottom:24px;", rule.css())
        }
        HeaderLayout::Banner { background, name, .. } => format!(
            "background:{};color:{};padding:24px;margin:-32px -32px 24px -32px;",
            background.css(),
            name.css()
        ),
        HeaderLayout::Boxed { border, background } => format!(
            "border:1px solid {};background:{};padding:16px;",
            border.css(),
            background.css()
        ),
    }
}

fn contact_color(style: &TemplateStyle) -> String {
    match style.header {
        HeaderLayout::Banner { contact, .. } => contact.css(),
        _ => style.muted.css(),
    }
}

fn write_header(out: &mut String, header: &HeaderBlock, style: &TemplateStyle) {
    let _ = write!(
        out,
        r#"<header style="margin-bottom:24px;{}">"#,
        header_container_css(style)
    );
    if let Some(photo) = &header.photo_url {
        let _ = write!(
            out,
            r#"<img class="photo" src="{}" alt="" style="width:96px;height:96px;border-radius:50%;object-fit:cover;">"#,
            escape(photo.as_str())
        );
    }
    let _ = write!(
        out,
        r#"<h1 style="font-size:24px;font-weight:700;margin:0 0 8px 0;">{}</h1>"#,
        escape(header.name.as_str())
    );
    if !header.contacts.is_empty() {
        let _ = write!(
            out,
            r#"<div class="contacts" style="font-size:14px;color:{};">"#,
            contact_color(style)
        );
        for contact in &header.contacts {
            let _ = write!(out, "<div>{}</div>", escape(contact.value.as_str()));
        }
        out.push_str("</div>");
    }
    out.push_str("</header>");
}

fn heading_css(style: &TemplateStyle) -> String {
    let h = &style.heading;
    let mut css = format!(
        "font-size:18px;margin:0 0 12px 0;color:{};font-weight:{};",
        h.color.css(),
        if h.bold { 700 } else { 300 }
    );
    if h.uppercase {
        css.push_str("text-transform:uppercase;letter-spacing:0.05em;");
    }
    match h.decoration {
        HeadingDecoration::Plain => {}
        HeadingDecoration::Underline { rule } => {
            let _ = write!(css, "border-bottom:1px solid {};padding-bottom:4px;", rule.css());
        }
        HeadingDecoration::Band { background } => {
            let _ = write!(css, "background:{};padding:4px 12px;", background.css());
        }
        HeadingDecoration::LeftRule { rule } => {
            let _ = write!(css, "border-left:2px solid {};padding-left:8px;", rule.css());
        }
    }
    css
}

fn write_section(out: &mut String, section: &RenderedSection, style: &TemplateStyle) {
    let _ = write!(
        out,
        r#"<section class="section-{kind}" style="margin-bottom:24px;"><h2 style="{css}">{heading}</h2>"#,
        kind = section.kind.as_str(),
        css = heading_css(style),
        heading = section.heading,
    );
    match &section.body {
        SectionBody::Prose(text) => {
            let _ = write!(
                out,
                r#"<div class="rich" style="font-size:14px;line-height:1.6;">{}</div>"#,
                text.0
            );
        }
        SectionBody::Chips(chips) => {
            out.push_str(r#"<div style="display:flex;flex-wrap:wrap;gap:8px;">"#);
            for chip in chips {
                let _ = write!(
                    out,
                    r#"<span class="chip" style="padding:4px 12px;font-size:12px;border-radius:4px;background:{};color:{};">{}</span>"#,
                    style.chip.background.css(),
                    style.chip.text.css(),
                    escape(chip.as_str())
                );
            }
            out.push_str("</div>");
        }
        SectionBody::Entries(entries) => {
            for entry in entries {
                write_entry(out, entry, style);
            }
        }
    }
    out.push_str("</section>");
}

fn write_entry(out: &mut String, entry: &Entry, style: &TemplateStyle) {
    let muted = style.muted.css();
    out.push_str(r#"<div class="entry" style="margin-bottom:16px;">"#);
    out.push_str(r#"<div style="display:flex;justify-content:space-between;">"#);
    let _ = write!(
        out,
        r#"<h3 style="font-size:16px;font-weight:600;margin:0;">{}{}</h3>"#,
        escape(entry.title.as_str()),
        if entry.featured { " ★" } else { "" }
    );
    if let Some(dates) = &entry.dates {
        let _ = write!(
            out,
            r#"<span class="dates" style="font-size:14px;color:{muted};">{}</span>"#,
            escape(dates.as_str())
        );
    }
    out.push_str("</div>");
    if !entry.subtitle.is_empty() {
        let joined = entry.subtitle.join(" • ");
        let _ = write!(
            out,
            r#"<div style="font-size:14px;color:{muted};">{}</div>"#,
            escape(joined.as_str())
        );
    }
    if let Some(body) = &entry.body {
        let _ = write!(
            out,
            r#"<div class="rich" style="font-size:14px;line-height:1.6;">{}</div>"#,
            body.0
        );
    }
    for (label, value) in &entry.details {
        let _ = write!(
            out,
            r#"<p style="font-size:12px;color:{muted};margin:4px 0 0 0;"><strong>{}:</strong> {}</p>"#,
            escape(label.as_str()),
            escape(value.as_str())
        );
    }
    out.push_str("</div>");
}
