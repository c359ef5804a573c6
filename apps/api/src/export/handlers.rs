use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::errors::AppError;
use crate::export::{docx, pdf, ExportArtifact, ExportError, ExportFormat, PROGRESS_IDLE};
use crate::render::render;
use crate::state::AppState;

/// Allows one export at a time and remembers the last progress value.
#[derive(Clone, Default)]
pub struct ExportTracker {
    busy: Arc<AtomicBool>,
    progress: Arc<AtomicU8>,
}

/// Releases the tracker when the export finishes, however it finishes.
struct ExportSlot {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportSlot {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

impl ExportTracker {
    fn acquire(&self) -> Option<ExportSlot> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.progress.store(PROGRESS_IDLE, Ordering::SeqCst);
        Some(ExportSlot {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn reporter(&self) -> impl FnMut(u8) + Send + 'static {
        let progress = Arc::clone(&self.progress);
        move |value| progress.store(value, Ordering::SeqCst)
    }
}

/// Runs `job` on the blocking pool holding `slot`. The slot goes with the job, so it is only
/// released once the work is done, even if the request waiting on it has gone away.
fn spawn_export<T, F>(slot: ExportSlot, job: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let _slot = slot;
        job()
    })
}

#[derive(Serialize)]
pub struct ExportProgressResponse {
    pub progress: u8,
    pub busy: bool,
}

/// GET /api/v1/export/progress
pub async fn handle_export_progress(State(state): State<AppState>) -> Json<ExportProgressResponse> {
    Json(ExportProgressResponse {
        progress: state.exports.progress(),
        busy: state.exports.is_busy(),
    })
}

/// GET /api/v1/export/pdf
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    run_export(&state, ExportFormat::Pdf).await
}

/// GET /api/v1/export/docx
pub async fn handle_export_docx(State(state): State<AppState>) -> Result<Response, AppError> {
    run_export(&state, ExportFormat::Docx).await
}

async fn run_export(state: &AppState, format: ExportFormat) -> Result<Response, AppError> {
    let slot = state
        .exports
        .acquire()
        .ok_or_else(|| AppError::Conflict("An export is already in progress".to_string()))?;

    let snapshot = state.studio.snapshot().await;
    let rasterizer = Arc::clone(&state.rasterizer);
    let mut report = state.exports.reporter();

    // Rasterizing and encoding are CPU-bound.
    let result = spawn_export(slot, move || -> Result<ExportArtifact, ExportError> {
        let resume = &snapshot.resume;
        match format {
            ExportFormat::Pdf => {
                let doc = render(resume, &snapshot.selected_template);
                pdf::export_pdf(&doc, &resume.personal_info.full_name, rasterizer.as_ref(), &mut report)
            }
            ExportFormat::Docx => docx::export_docx(resume, &mut report),
        }
    })
    .await
    .map_err(|e| {
        state.exports.progress.store(PROGRESS_IDLE, Ordering::SeqCst);
        anyhow::anyhow!("export task failed: {e}")
    })?;

    let artifact = result.map_err(|e| {
        error!("{} export failed: {e}", format.extension());
        e
    })?;
    info!(
        file_name = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "Export complete"
    );
    Ok(download(artifact))
}

fn download(artifact: ExportArtifact) -> Response {
    let disposition = content_disposition(&artifact.file_name);
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(artifact.format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// `attachment` with an ASCII fallback name and the UTF-8 name percent-encoded (RFC 6266).
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    let encoded: String = file_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();
    let value = format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}");
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_allows_one_export_at_a_time() {
        let tracker = ExportTracker::default();
        let slot = tracker.acquire().expect("first export starts");
        assert!(tracker.is_busy());
        assert!(tracker.acquire().is_none());
        drop(slot);
        assert!(!tracker.is_busy());
        assert!(tracker.acquire().is_some());
    }

    #[tokio::test]
    async fn test_abandoned_export_keeps_slot_until_work_finishes() {
        let tracker = ExportTracker::default();
        let slot = tracker.acquire().expect("first export starts");
        let (release, wait) = std::sync::mpsc::channel::<()>();
        let handle = spawn_export(slot, move || {
            let _ = wait.recv();
        });

        // The handler future is gone but the job is still running.
        drop(handle);
        assert!(tracker.is_busy());
        assert!(tracker.acquire().is_none());

        release.send(()).unwrap();
        for _ in 0..200 {
            if !tracker.is_busy() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_reporter_updates_progress() {
        let tracker = ExportTracker::default();
        let mut report = tracker.reporter();
        report(50);
        assert_eq!(tracker.progress(), 50);
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        let value = content_disposition("Zoë Smith.pdf");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Zo_ Smith.pdf\"; filename*=UTF-8''Zo%C3%AB%20Smith.pdf"
        );
    }
}
