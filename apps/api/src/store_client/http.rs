use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ResumeStore, StoreError};
use crate::models::resume::{Resume, ResumeSummary};
use crate::models::template::Template;

/// Error body shape used by the remote API (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

/// Remote résumé API client. All paths live under `{base_url}/api`.
#[derive(Clone)]
pub struct HttpResumeStore {
    client: Client,
    base_url: String,
}

impl HttpResumeStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Sends `request` and maps non-2xx responses to `StoreError`. `id` names the record for
    /// 404s, when there is one.
    async fn send(&self, request: RequestBuilder, id: Option<&str>) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        warn!("Store API returned {}: {}", status, body);
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ResumeStore for HttpResumeStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        let response = self.send(self.client.get(self.url("/templates")), None).await?;
        Self::json(response).await
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, StoreError> {
        let response = self.send(self.client.get(self.url("/resumes")), None).await?;
        Self::json(response).await
    }

    async fn get_resume(&self, id: &str) -> Result<Resume, StoreError> {
        let request = self.client.get(self.url(&format!("/resumes/{id}")));
        let response = self.send(request, Some(id)).await?;
        Self::json(response).await
    }

    async fn create_resume(&self, resume: &Resume) -> Result<Resume, StoreError> {
        let request = self.client.post(self.url("/resumes")).json(&resume.payload());
        let response = self.send(request, None).await?;
        let created: Resume = Self::json(response).await?;
        debug!(id = ?created.id, "Created resume");
        Ok(created)
    }

    async fn update_resume(&self, id: &str, resume: &Resume) -> Result<Resume, StoreError> {
        let request = self
            .client
            .put(self.url(&format!("/resumes/{id}")))
            .json(&resume.payload());
        let response = self.send(request, Some(id)).await?;
        Self::json(response).await
    }

    async fn delete_resume(&self, id: &str) -> Result<(), StoreError> {
        let request = self.client.delete(self.url(&format!("/resumes/{id}")));
        self.send(request, Some(id)).await?;
        Ok(())
    }
}
