//! Structured-document export: walks the résumé model directly and packages a WordprocessingML
//! file. The selected template plays no part here.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::plain_text::strip_markup;
use crate::export::{
    with_progress_reset, ExportArtifact, ExportError, ExportFormat, PROGRESS_DONE,
    PROGRESS_ENCODED,
};
use crate::models::resume::Resume;
use crate::render::document::{date_range, NAME_PLACEHOLDER};
use crate::render::SectionKind;

pub const CONTACT_SEPARATOR: &str = " | ";
pub const SKILL_SEPARATOR: &str = ", ";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const NS_REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

// ────────────────────────────────────────────────────────────────────────────
// Flow model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    /// Centered name.
    Title,
    /// Centered contact line.
    Contact,
    /// Section heading.
    Heading,
    /// Bold first line of an item.
    EntryTitle,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub text: String,
}

impl Paragraph {
    fn new(kind: ParagraphKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Joins the non-empty parts with `sep`.
fn join_present<'a>(parts: impl IntoIterator<Item = &'a str>, sep: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Pushes a body paragraph unless `text` is empty.
fn push_body(out: &mut Vec<Paragraph>, text: String) {
    if !text.is_empty() {
        out.push(Paragraph::new(ParagraphKind::Body, text));
    }
}

fn push_entry_title(out: &mut Vec<Paragraph>, text: String) {
    if !text.is_empty() {
        out.push(Paragraph::new(ParagraphKind::EntryTitle, text));
    }
}

/// The date line for an experience item, empty when neither end of the range is known.
fn experience_dates(start: &str, end: &str, current: bool) -> String {
    if start.trim().is_empty() && end.trim().is_empty() && !current {
        String::new()
    } else {
        date_range(start.trim(), end.trim(), current)
    }
}

/// Builds the paragraph sequence for `resume`. Sections follow the renderer's order and
/// presence rule; rich text is reduced to plain text.
pub fn build_flow(resume: &Resume) -> Vec<Paragraph> {
    let info = &resume.personal_info;
    let mut out = Vec::new();

    let name = info.full_name.trim();
    out.push(Paragraph::new(
        ParagraphKind::Title,
        if name.is_empty() { NAME_PLACEHOLDER } else { name },
    ));

    let contact = join_present(
        [
            info.email.as_str(),
            info.phone.as_str(),
            info.location.as_str(),
            info.linkedin.as_str(),
            info.github.as_str(),
            info.website.as_str(),
            info.twitter.as_str(),
        ],
        CONTACT_SEPARATOR,
    );
    if !contact.is_empty() {
        out.push(Paragraph::new(ParagraphKind::Contact, contact));
    }

    for kind in SectionKind::ORDER {
        if !kind.is_present(resume) {
            continue;
        }
        out.push(Paragraph::new(ParagraphKind::Heading, kind.heading()));
        let start = out.len();
        section_paragraphs(resume, kind, &mut out);
        // Items that are all blank still leave an (empty) body under the heading.
        if out.len() == start {
            out.push(Paragraph::new(ParagraphKind::Body, String::new()));
        }
    }
    out
}

fn section_paragraphs(resume: &Resume, kind: SectionKind, out: &mut Vec<Paragraph>) {
    match kind {
        SectionKind::Summary => push_body(out, strip_markup(&resume.personal_info.summary)),
        SectionKind::Experience => {
            for exp in &resume.experience {
                let dates = experience_dates(&exp.start_date, &exp.end_date, exp.current);
                push_entry_title(
                    out,
                    join_present([exp.title.as_str(), exp.company.as_str()], " - "),
                );
                push_body(out, join_present([exp.location.as_str(), dates.as_str()], " | "));
                push_body(out, strip_markup(&exp.description));
            }
        }
        SectionKind::Education => {
            for edu in &resume.education {
                push_entry_title(
                    out,
                    join_present([edu.degree.as_str(), edu.institution.as_str()], " - "),
                );
                let gpa = if edu.gpa.trim().is_empty() {
                    String::new()
                } else {
                    format!("GPA: {}", edu.gpa.trim())
                };
                push_body(
                    out,
                    join_present(
                        [edu.location.as_str(), edu.graduation_date.as_str(), gpa.as_str()],
                        " | ",
                    ),
                );
            }
        }
        SectionKind::Skills => push_body(
            out,
            join_present(resume.skills.iter().map(String::as_str), SKILL_SEPARATOR),
        ),
        SectionKind::Projects => {
            for project in &resume.projects {
                push_entry_title(out, project.name.trim().to_string());
                push_body(out, strip_markup(&project.description));
                if !project.technologies.trim().is_empty() {
                    push_body(out, format!("Technologies: {}", project.technologies.trim()));
                }
                if !project.link.trim().is_empty() {
                    push_body(out, format!("Link: {}", project.link.trim()));
                }
            }
        }
        SectionKind::Achievements => {
            for achievement in &resume.achievements {
                push_entry_title(out, achievement.title.trim().to_string());
                push_body(
                    out,
                    join_present(
                        [achievement.organization.as_str(), achievement.date.as_str()],
                        " | ",
                    ),
                );
                push_body(out, strip_markup(&achievement.description));
            }
        }
        SectionKind::References => {
            for reference in &resume.references {
                push_entry_title(out, reference.name.trim().to_string());
                push_body(
                    out,
                    join_present([reference.position.as_str(), reference.company.as_str()], " | "),
                );
                push_body(
                    out,
                    join_present([reference.email.as_str(), reference.phone.as_str()], " | "),
                );
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Packaging
// ────────────────────────────────────────────────────────────────────────────

/// Builds the DOCX for `resume`.
pub fn export_docx(
    resume: &Resume,
    progress: &mut dyn FnMut(u8),
) -> Result<ExportArtifact, ExportError> {
    with_progress_reset(progress, |progress| {
        let flow = build_flow(resume);
        let document = document_xml(&flow)?;
        progress(PROGRESS_ENCODED);

        let bytes = package(&document)?;
        progress(PROGRESS_DONE);

        Ok(ExportArtifact::new(
            &resume.personal_info.full_name,
            ExportFormat::Docx,
            bytes,
        ))
    })
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn start_xml() -> Result<XmlWriter, ExportError> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn finish_xml(w: XmlWriter) -> Vec<u8> {
    w.into_inner().into_inner()
}

fn write_start(w: &mut XmlWriter, tag: &str) -> Result<(), ExportError> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn write_end(w: &mut XmlWriter, tag: &str) -> Result<(), ExportError> {
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_empty(w: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
    let mut el = BytesStart::new(tag);
    for attr in attrs {
        el.push_attribute(*attr);
    }
    w.write_event(Event::Empty(el))?;
    Ok(())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// `text` restricted to the XML 1.0 `Char` production. Control characters become spaces;
/// U+FFFE and U+FFFF are dropped.
fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    text.chars()
        .filter(|c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .map(|c| if is_xml_char(c) { c } else { ' ' })
        .collect()
}

fn write_paragraph(w: &mut XmlWriter, para: &Paragraph) -> Result<(), ExportError> {
    write_start(w, "w:p")?;

    let (style, centered, bold) = match para.kind {
        ParagraphKind::Title => (Some("Title"), true, false),
        ParagraphKind::Contact => (None, true, false),
        ParagraphKind::Heading => (Some("Heading1"), false, false),
        ParagraphKind::EntryTitle => (None, false, true),
        ParagraphKind::Body => (None, false, false),
    };
    if style.is_some() || centered {
        write_start(w, "w:pPr")?;
        if let Some(style) = style {
            write_empty(w, "w:pStyle", &[("w:val", style)])?;
        }
        if centered {
            write_empty(w, "w:jc", &[("w:val", "center")])?;
        }
        write_end(w, "w:pPr")?;
    }

    write_start(w, "w:r")?;
    if bold {
        write_start(w, "w:rPr")?;
        write_empty(w, "w:b", &[])?;
        write_end(w, "w:rPr")?;
    }
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    w.write_event(Event::Start(t))?;
    w.write_event(Event::Text(BytesText::new(&xml_chars(&para.text))))?;
    write_end(w, "w:t")?;
    write_end(w, "w:r")?;

    write_end(w, "w:p")
}

pub fn document_xml(flow: &[Paragraph]) -> Result<Vec<u8>, ExportError> {
    let mut w = start_xml()?;
    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", NS_MAIN));
    w.write_event(Event::Start(root))?;
    write_start(&mut w, "w:body")?;
    for para in flow {
        write_paragraph(&mut w, para)?;
    }
    write_end(&mut w, "w:body")?;
    write_end(&mut w, "w:document")?;
    Ok(finish_xml(w))
}

fn styles_xml() -> Result<Vec<u8>, ExportError> {
    let mut w = start_xml()?;
    let mut root = BytesStart::new("w:styles");
    root.push_attribute(("xmlns:w", NS_MAIN));
    w.write_event(Event::Start(root))?;

    // (id, display name, half-point size, bold)
    for (id, name, size, bold) in [("Title", "Title", "48", true), ("Heading1", "heading 1", "28", true)] {
        let mut style = BytesStart::new("w:style");
        style.push_attribute(("w:type", "paragraph"));
        style.push_attribute(("w:styleId", id));
        w.write_event(Event::Start(style))?;
        write_empty(&mut w, "w:name", &[("w:val", name)])?;
        write_empty(&mut w, "w:qFormat", &[])?;
        write_start(&mut w, "w:rPr")?;
        if bold {
            write_empty(&mut w, "w:b", &[])?;
        }
        write_empty(&mut w, "w:sz", &[("w:val", size)])?;
        write_end(&mut w, "w:rPr")?;
        write_end(&mut w, "w:style")?;
    }

    write_end(&mut w, "w:styles")?;
    Ok(finish_xml(w))
}

fn content_types_xml() -> Result<Vec<u8>, ExportError> {
    let mut w = start_xml()?;
    let mut root = BytesStart::new("Types");
    root.push_attribute(("xmlns", NS_CONTENT_TYPES));
    w.write_event(Event::Start(root))?;
    write_empty(
        &mut w,
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    write_empty(&mut w, "Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    write_empty(
        &mut w,
        "Override",
        &[
            ("PartName", "/word/document.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            ),
        ],
    )?;
    write_empty(
        &mut w,
        "Override",
        &[
            ("PartName", "/word/styles.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
            ),
        ],
    )?;
    write_end(&mut w, "Types")?;
    Ok(finish_xml(w))
}

fn relationships_xml(rel_type: &str, target: &str) -> Result<Vec<u8>, ExportError> {
    let mut w = start_xml()?;
    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", NS_PKG_REL));
    w.write_event(Event::Start(root))?;
    write_empty(
        &mut w,
        "Relationship",
        &[("Id", "rId1"), ("Type", rel_type), ("Target", target)],
    )?;
    write_end(&mut w, "Relationships")?;
    Ok(finish_xml(w))
}

fn package(document: &[u8]) -> Result<Vec<u8>, ExportError> {
    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", content_types_xml()?),
        ("_rels/.rels", relationships_xml(NS_REL_DOC, "word/document.xml")?),
        ("word/_rels/document.xml.rels", relationships_xml(NS_REL_STYLES, "styles.xml")?),
        ("word/document.xml", document.to_vec()),
        ("word/styles.xml", styles_xml()?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}
