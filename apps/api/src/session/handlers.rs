use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

use crate::editor::ResumeEdit;
use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::models::template::Template;
use crate::render::render;
use crate::session::SessionSnapshot;
use crate::state::AppState;

/// Accepts either one edit object or an array applied as a unit.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EditRequest {
    Batch(Vec<ResumeEdit>),
    Single(ResumeEdit),
}

impl EditRequest {
    fn into_edits(self) -> Vec<ResumeEdit> {
        match self {
            EditRequest::Batch(edits) => edits,
            EditRequest::Single(edit) => vec![edit],
        }
    }
}

#[derive(Deserialize)]
pub struct SelectTemplateRequest {
    pub template_id: String,
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub template: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<Template>> {
    Json(state.studio.list_templates().await)
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(state.studio.list_resumes().await?))
}

/// POST /api/v1/resumes/new
pub async fn handle_new_resume(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.studio.new_resume().await)
}

/// POST /api/v1/resumes/:id/load
pub async fn handle_load_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.studio.load(&id).await?))
}

/// DELETE /api/v1/resumes/:id?confirm=true
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.studio.delete(&id, query.confirm).await?))
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.studio.snapshot().await)
}

/// POST /api/v1/session/edits
pub async fn handle_apply_edits(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.studio.apply(req.into_edits()).await?))
}

/// PUT /api/v1/session/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.studio.select_template(&req.template_id).await?))
}

/// POST /api/v1/session/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.studio.save().await?))
}

/// GET /api/v1/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Html<String> {
    let snapshot = state.studio.snapshot().await;
    let template_id = query
        .template
        .as_deref()
        .unwrap_or(&snapshot.selected_template);
    Html(render(&snapshot.resume, template_id).to_html())
}
