use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ResumeStore, StoreError};
use crate::models::resume::{Resume, ResumeSummary};
use crate::models::template::Template;
use crate::templates;

/// In-process store with the remote API's semantics: server-assigned ids, server-stamped
/// timestamps, insertion-order listing and `NotFound` for unknown ids.
#[derive(Default)]
pub struct MemoryStore {
    resumes: RwLock<Vec<Resume>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from the fields a create/update body carries.
    fn stored_copy(resume: &Resume) -> Resume {
        Resume {
            id: None,
            created_at: None,
            updated_at: None,
            ..resume.clone()
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        Ok(templates::list())
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, StoreError> {
        let resumes = self.resumes.read().await;
        Ok(resumes
            .iter()
            .filter_map(|r| {
                r.id.as_ref().map(|id| ResumeSummary {
                    id: id.clone(),
                    title: r.title.clone(),
                    updated_at: r.updated_at,
                })
            })
            .collect())
    }

    async fn get_resume(&self, id: &str) -> Result<Resume, StoreError> {
        let resumes = self.resumes.read().await;
        resumes
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_resume(&self, resume: &Resume) -> Result<Resume, StoreError> {
        let now = Utc::now().naive_utc();
        let record = Resume {
            id: Some(Uuid::new_v4().to_string()),
            created_at: Some(now),
            updated_at: Some(now),
            ..Self::stored_copy(resume)
        };
        self.resumes.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_resume(&self, id: &str, resume: &Resume) -> Result<Resume, StoreError> {
        let mut resumes = self.resumes.write().await;
        let slot = resumes
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = Resume {
            id: slot.id.take(),
            created_at: slot.created_at,
            updated_at: Some(Utc::now().naive_utc()),
            ..Self::stored_copy(resume)
        };
        Ok(slot.clone())
    }

    async fn delete_resume(&self, id: &str) -> Result<(), StoreError> {
        let mut resumes = self.resumes.write().await;
        let before = resumes.len();
        resumes.retain(|r| r.id.as_deref() != Some(id));
        if resumes.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Resume {
        let mut r = Resume::default();
        r.title = name.to_string();
        r.personal_info.full_name = name.to_string();
        r
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let mut draft = named("Ada");
        draft.id = Some("client-side".into());

        let created = store.create_resume(&draft).await.unwrap();
        let id = created.id.clone().unwrap();
        assert_ne!(id, "client-side");
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.get_resume(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let store = MemoryStore::new();
        let created = store.create_resume(&named("Ada")).await.unwrap();
        let id = created.id.clone().unwrap();

        let mut edited = created.clone();
        edited.title = "Updated".into();
        edited.created_at = None;
        let updated = store.update_resume(&id, &edited).await.unwrap();
        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Updated");
        assert_eq!(store.list_resumes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get_resume("x").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update_resume("x", &Resume::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_resume("x").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_delete_removes() {
        let store = MemoryStore::new();
        let a = store.create_resume(&named("A")).await.unwrap();
        store.create_resume(&named("B")).await.unwrap();

        let titles: Vec<String> = store
            .list_resumes()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["A", "B"]);

        store.delete_resume(a.id.as_deref().unwrap()).await.unwrap();
        assert_eq!(store.list_resumes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_is_builtin() {
        let catalog = MemoryStore::new().list_templates().await.unwrap();
        assert_eq!(catalog.len(), 7);
    }
}
