// Renderer: résumé + template id → rendered visual (structured blocks, HTML preview).

pub mod document;
pub mod html;

pub use document::{
    render, Entry, HeaderBlock, RenderedDocument, RenderedSection, SectionBody, SectionKind,
};
