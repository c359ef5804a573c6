pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog + stored résumés
        .route("/api/v1/templates", get(session::handle_list_templates))
        .route("/api/v1/resumes", get(session::handle_list_resumes))
        .route("/api/v1/resumes/new", post(session::handle_new_resume))
        .route("/api/v1/resumes/:id/load", post(session::handle_load_resume))
        .route("/api/v1/resumes/:id", delete(session::handle_delete_resume))
        // Current session
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/edits", post(session::handle_apply_edits))
        .route("/api/v1/session/template", put(session::handle_select_template))
        .route("/api/v1/session/save", post(session::handle_save))
        .route("/api/v1/preview", get(session::handle_preview))
        // Export
        .route("/api/v1/export/pdf", get(export::handle_export_pdf))
        .route("/api/v1/export/docx", get(export::handle_export_docx))
        .route("/api/v1/export/progress", get(export::handle_export_progress))
        .with_state(state)
}
