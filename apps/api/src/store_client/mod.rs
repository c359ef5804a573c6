/// Persistence client: the studio's only route to stored résumés and the template catalog.
///
/// Two implementations share the `ResumeStore` trait: `HttpResumeStore` talks to the remote
/// résumé API, `MemoryStore` keeps everything in-process for stand-alone runs and tests.
/// Failures are reported once to the caller. Nothing here retries.
use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::{Resume, ResumeSummary};
use crate::models::template::Template;

pub mod http;
pub mod memory;

pub use http::HttpResumeStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Resume not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError>;

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, StoreError>;

    async fn get_resume(&self, id: &str) -> Result<Resume, StoreError>;

    /// Creates a record from `resume` (id and timestamps are not sent) and returns it with
    /// the server-assigned id.
    async fn create_resume(&self, resume: &Resume) -> Result<Resume, StoreError>;

    async fn update_resume(&self, id: &str, resume: &Resume) -> Result<Resume, StoreError>;

    async fn delete_resume(&self, id: &str) -> Result<(), StoreError>;
}
