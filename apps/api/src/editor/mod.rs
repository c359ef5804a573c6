// Résumé editing: explicit patches applied to one in-memory `Resume`.
// The editing surface sends `ResumeEdit`s; nothing here validates field contents.

pub mod edits;
pub mod sections;

use thiserror::Error;

pub use edits::ResumeEdit;
pub use sections::Section;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("index {index} is out of range for {section} (length {len})")]
    IndexOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },

    #[error("unknown field '{field}' in {scope}")]
    UnknownField { scope: &'static str, field: String },

    #[error("field '{field}' expects a {expected} value")]
    WrongValueKind {
        field: String,
        expected: &'static str,
    },
}
