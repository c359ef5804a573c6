// Session controller: owns the one in-memory résumé being edited.
// Every mutation goes through `Studio`; the store is only touched on load, save, delete and
// list. Locks are never held across a store call.

pub mod autosave;
pub mod handlers;

use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::editor::{EditError, ResumeEdit};
use crate::models::resume::{Resume, ResumeSummary};
use crate::models::template::Template;
use crate::store_client::{ResumeStore, StoreError};
use crate::templates;

use autosave::Autosave;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("deleting resume {0} requires confirmation")]
    Unconfirmed(String),

    #[error("template id must not be blank")]
    BlankTemplate,
}

/// What the editing surface sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub resume: Resume,
    pub selected_template: String,
    /// Bumped on every local change.
    pub revision: u64,
}

struct EditorState {
    resume: Resume,
    selected_template: String,
    revision: u64,
    /// Bumped whenever the résumé is replaced wholesale (new, load, delete-reset). A store
    /// response that arrives for an older epoch is ignored.
    epoch: u64,
}

impl EditorState {
    fn fresh() -> Self {
        let resume = Resume::default();
        Self {
            selected_template: resume.template_id.clone(),
            resume,
            revision: 0,
            epoch: 0,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            resume: self.resume.clone(),
            selected_template: self.selected_template.clone(),
            revision: self.revision,
        }
    }

    fn replace(&mut self, resume: Resume) {
        self.selected_template = resume.template_id.clone();
        self.resume = resume;
        self.revision += 1;
        self.epoch += 1;
    }
}

struct StudioInner {
    state: Mutex<EditorState>,
    store: Arc<dyn ResumeStore>,
    autosave: Autosave,
}

#[derive(Clone)]
pub struct Studio {
    inner: Arc<StudioInner>,
}

impl Studio {
    pub fn new(store: Arc<dyn ResumeStore>, autosave_delay: Duration) -> Self {
        Self {
            inner: Arc::new(StudioInner {
                state: Mutex::new(EditorState::fresh()),
                store,
                autosave: Autosave::new(autosave_delay),
            }),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    /// Resets to an empty résumé and drops any pending autosave.
    pub async fn new_resume(&self) -> SessionSnapshot {
        self.inner.autosave.cancel();
        let mut state = self.inner.state.lock().await;
        state.replace(Resume::default());
        state.snapshot()
    }

    /// Replaces the in-memory résumé with the stored one and selects its template.
    pub async fn load(&self, id: &str) -> Result<SessionSnapshot, SessionError> {
        let resume = self.inner.store.get_resume(id).await?;
        self.inner.autosave.cancel();
        let mut state = self.inner.state.lock().await;
        state.replace(resume);
        info!(id, "Loaded resume");
        Ok(state.snapshot())
    }

    /// Applies `edits` in order as one unit: either all apply or the résumé is unchanged.
    pub async fn apply(&self, edits: Vec<ResumeEdit>) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.inner.state.lock().await;
        let mut draft = state.resume.clone();
        draft.apply_all(edits)?;

        if draft.template_id != state.resume.template_id {
            state.selected_template = draft.template_id.clone();
        }
        state.resume = draft;
        state.revision += 1;
        self.schedule_autosave(&state);
        Ok(state.snapshot())
    }

    /// Selects a template for preview and export; the résumé records the choice.
    pub async fn select_template(&self, template_id: &str) -> Result<SessionSnapshot, SessionError> {
        let template_id = template_id.trim();
        if template_id.is_empty() {
            return Err(SessionError::BlankTemplate);
        }
        if !templates::is_known(template_id) {
            warn!(template_id, "Unknown template selected; rendering with the default style");
        }
        let mut state = self.inner.state.lock().await;
        state.selected_template = template_id.to_string();
        state.resume.template_id = template_id.to_string();
        state.revision += 1;
        self.schedule_autosave(&state);
        Ok(state.snapshot())
    }

    /// Updates the stored record when the résumé has an id, creates one otherwise.
    ///
    /// Only the server-assigned id and timestamps are taken from the response, and only if the
    /// same résumé is still loaded, so edits made while the call was in flight are kept.
    pub async fn save(&self) -> Result<SessionSnapshot, SessionError> {
        let (resume, epoch) = {
            let state = self.inner.state.lock().await;
            (state.resume.clone(), state.epoch)
        };

        let saved = match resume.id.as_deref() {
            Some(id) => self.inner.store.update_resume(id, &resume).await,
            None => self.inner.store.create_resume(&resume).await,
        }
        .map_err(|e| {
            error!("Failed to save resume: {e}");
            e
        })?;

        let mut state = self.inner.state.lock().await;
        if state.epoch == epoch {
            if state.resume.id.is_none() {
                state.resume.id = saved.id.clone();
                info!(id = ?saved.id, "Created resume");
            }
            state.resume.created_at = saved.created_at;
            state.resume.updated_at = saved.updated_at;
        }
        Ok(state.snapshot())
    }

    /// Deletes a stored résumé. Requires `confirmed`; there is no undo. If the deleted record
    /// is the one being edited, the session resets to an empty résumé.
    pub async fn delete(&self, id: &str, confirmed: bool) -> Result<SessionSnapshot, SessionError> {
        if !confirmed {
            return Err(SessionError::Unconfirmed(id.to_string()));
        }
        self.inner.store.delete_resume(id).await?;
        info!(id, "Deleted resume");

        let mut state = self.inner.state.lock().await;
        if state.resume.id.as_deref() == Some(id) {
            self.inner.autosave.cancel();
            state.replace(Resume::default());
        }
        Ok(state.snapshot())
    }

    pub async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, SessionError> {
        Ok(self.inner.store.list_resumes().await?)
    }

    /// The store's catalog, or the built-in one if the store cannot be reached.
    pub async fn list_templates(&self) -> Vec<Template> {
        match self.inner.store.list_templates().await {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => templates::list(),
            Err(e) => {
                warn!("Template catalog unavailable, using built-in list: {e}");
                templates::list()
            }
        }
    }

    /// Autosave only applies to résumés that already exist in the store.
    fn schedule_autosave(&self, state: &EditorState) {
        if state.resume.id.is_none() || !self.inner.autosave.is_enabled() {
            return;
        }
        let studio: Weak<StudioInner> = Arc::downgrade(&self.inner);
        self.inner.autosave.schedule(move || async move {
            let Some(inner) = studio.upgrade() else {
                return;
            };
            if let Err(e) = (Studio { inner }).save().await {
                warn!("Autosave failed: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_client::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a memory store, counting writes and optionally delaying creates.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        creates: AtomicUsize,
        updates: AtomicUsize,
        create_delay: Option<Duration>,
    }

    #[async_trait]
    impl ResumeStore for RecordingStore {
        async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
            self.inner.list_templates().await
        }
        async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, StoreError> {
            self.inner.list_resumes().await
        }
        async fn get_resume(&self, id: &str) -> Result<Resume, StoreError> {
            self.inner.get_resume(id).await
        }
        async fn create_resume(&self, resume: &Resume) -> Result<Resume, StoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.create_delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.create_resume(resume).await
        }
        async fn update_resume(&self, id: &str, resume: &Resume) -> Result<Resume, StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_resume(id, resume).await
        }
        async fn delete_resume(&self, id: &str) -> Result<(), StoreError> {
            self.inner.delete_resume(id).await
        }
    }

    struct OfflineStore;

    fn offline() -> StoreError {
        StoreError::Api {
            status: 503,
            message: "offline".into(),
        }
    }

    #[async_trait]
    impl ResumeStore for OfflineStore {
        async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
            Err(offline())
        }
        async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, StoreError> {
            Err(offline())
        }
        async fn get_resume(&self, _: &str) -> Result<Resume, StoreError> {
            Err(offline())
        }
        async fn create_resume(&self, _: &Resume) -> Result<Resume, StoreError> {
            Err(offline())
        }
        async fn update_resume(&self, _: &str, _: &Resume) -> Result<Resume, StoreError> {
            Err(offline())
        }
        async fn delete_resume(&self, _: &str) -> Result<(), StoreError> {
            Err(offline())
        }
    }

    const NO_AUTOSAVE: Duration = Duration::ZERO;

    fn set_name(name: &str) -> ResumeEdit {
        ResumeEdit::SetPersonal {
            field: "full_name".into(),
            value: name.into(),
        }
    }

    fn studio_with(store: Arc<RecordingStore>, delay: Duration) -> Studio {
        Studio::new(store, delay)
    }

    #[tokio::test]
    async fn test_first_save_creates_and_adopts_id() {
        let store = Arc::new(RecordingStore::default());
        let studio = studio_with(Arc::clone(&store), NO_AUTOSAVE);
        studio.apply(vec![set_name("Ada")]).await.unwrap();

        let saved = studio.save().await.unwrap();
        let id = saved.resume.id.clone().expect("id adopted");
        assert!(saved.resume.created_at.is_some());
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);

        studio.apply(vec![set_name("Ada Lovelace")]).await.unwrap();
        studio.save().await.unwrap();
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        let stored = store.get_resume(&id).await.unwrap();
        assert_eq!(stored.personal_info.full_name, "Ada Lovelace");
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_create_echo_keeps_newer_edits() {
        let store = Arc::new(RecordingStore {
            create_delay: Some(Duration::from_secs(1)),
            ..Default::default()
        });
        let studio = studio_with(store, NO_AUTOSAVE);
        studio.apply(vec![set_name("Ada")]).await.unwrap();

        let saving = tokio::spawn({
            let studio = studio.clone();
            async move { studio.save().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        studio.apply(vec![set_name("Newer")]).await.unwrap();

        let after = saving.await.unwrap().unwrap();
        assert!(after.resume.id.is_some());
        assert_eq!(after.resume.personal_info.full_name, "Newer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_for_replaced_resume_is_ignored() {
        let store = Arc::new(RecordingStore {
            create_delay: Some(Duration::from_secs(1)),
            ..Default::default()
        });
        let studio = studio_with(store, NO_AUTOSAVE);

        let saving = tokio::spawn({
            let studio = studio.clone();
            async move { studio.save().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        studio.new_resume().await;

        let after = saving.await.unwrap().unwrap();
        assert!(after.resume.id.is_none());
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_resume_unchanged() {
        let studio = Studio::new(Arc::new(MemoryStore::new()), NO_AUTOSAVE);
        let before = studio.snapshot().await;

        let err = studio
            .apply(vec![
                set_name("Ada"),
                ResumeEdit::Remove {
                    section: crate::editor::Section::Experience,
                    index: 3,
                },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Edit(EditError::IndexOutOfRange { .. })));
        assert_eq!(studio.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_load_selects_stored_template() {
        let store = Arc::new(RecordingStore::default());
        let mut stored = Resume::default();
        stored.template_id = "template5".into();
        let id = store.create_resume(&stored).await.unwrap().id.unwrap();

        let studio = studio_with(store, NO_AUTOSAVE);
        let snap = studio.load(&id).await.unwrap();
        assert_eq!(snap.selected_template, "template5");
        assert_eq!(snap.resume.id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_and_resets_current() {
        let store = Arc::new(RecordingStore::default());
        let studio = studio_with(Arc::clone(&store), NO_AUTOSAVE);
        studio.apply(vec![set_name("Ada")]).await.unwrap();
        let id = studio.save().await.unwrap().resume.id.unwrap();

        assert!(matches!(
            studio.delete(&id, false).await,
            Err(SessionError::Unconfirmed(_))
        ));
        assert_eq!(store.list_resumes().await.unwrap().len(), 1);

        let snap = studio.delete(&id, true).await.unwrap();
        assert_eq!(snap.resume, Resume::default());
        assert!(store.list_resumes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_template_is_rejected() {
        let studio = Studio::new(Arc::new(MemoryStore::new()), NO_AUTOSAVE);
        assert!(matches!(
            studio.select_template("  ").await,
            Err(SessionError::BlankTemplate)
        ));
        let snap = studio.select_template("template3").await.unwrap();
        assert_eq!(snap.selected_template, "template3");
        assert_eq!(snap.resume.template_id, "template3");
    }

    #[tokio::test]
    async fn test_unknown_template_is_still_selected() {
        let studio = Studio::new(Arc::new(MemoryStore::new()), NO_AUTOSAVE);
        assert!(!templates::is_known("brochure"));
        let snap = studio.select_template(" brochure ").await.unwrap();
        assert_eq!(snap.selected_template, "brochure");
        assert_eq!(snap.revision, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_updates_stored_resume_after_quiet_period() {
        let store = Arc::new(RecordingStore::default());
        let studio = studio_with(Arc::clone(&store), Duration::from_millis(2000));
        studio.apply(vec![set_name("Ada")]).await.unwrap();
        let id = studio.save().await.unwrap().resume.id.unwrap();

        studio.apply(vec![set_name("Ada L")]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        studio.apply(vec![set_name("Ada Lovelace")]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        let stored = store.get_resume(&id).await.unwrap();
        assert_eq!(stored.personal_info.full_name, "Ada Lovelace");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsaved_resume_is_never_autosaved() {
        let store = Arc::new(RecordingStore::default());
        let studio = studio_with(Arc::clone(&store), Duration::from_millis(100));
        studio.apply(vec![set_name("Ada")]).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_offline_store_surfaces_errors_and_falls_back_catalog() {
        let studio = Studio::new(Arc::new(OfflineStore), NO_AUTOSAVE);
        assert!(matches!(studio.save().await, Err(SessionError::Store(_))));
        assert!(matches!(studio.load("x").await, Err(SessionError::Store(_))));
        assert_eq!(studio.list_templates().await.len(), 7);
        assert!(studio.snapshot().await.resume.id.is_none());
    }
}
