// Export pipeline: rendered visual → paged image PDF, résumé model → DOCX flow document.
// Both are one-way and never mutate the résumé. Progress callbacks are UI feedback only.

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod plain_text;
pub mod raster;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLBACK_FILE_STEM: &str = "Resume";

pub const PROGRESS_IDLE: u8 = 0;
pub const PROGRESS_RASTERIZED: u8 = 25;
pub const PROGRESS_PAGINATED: u8 = 50;
pub const PROGRESS_ENCODED: u8 = 75;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("DOCX packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A finished, downloadable file.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportArtifact {
    pub fn new(full_name: &str, format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            file_name: artifact_file_name(full_name, format),
            format,
            bytes: Bytes::from(bytes),
        }
    }
}

/// `"{full_name}.{ext}"`, falling back to "Resume" when the name is blank. Characters that
/// are invalid in file names on common platforms become `_`.
pub fn artifact_file_name(full_name: &str, format: ExportFormat) -> String {
    let sanitized: String = full_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = sanitized.trim().trim_matches('.');
    let stem = if stem.is_empty() { FALLBACK_FILE_STEM } else { stem };
    format!("{stem}.{}", format.extension())
}

/// Runs one export step sequence, resetting progress to zero if it fails.
pub(crate) fn with_progress_reset<T>(
    progress: &mut dyn FnMut(u8),
    run: impl FnOnce(&mut dyn FnMut(u8)) -> Result<T, ExportError>,
) -> Result<T, ExportError> {
    match run(&mut *progress) {
        Ok(value) => Ok(value),
        Err(e) => {
            progress(PROGRESS_IDLE);
            Err(e)
        }
    }
}
