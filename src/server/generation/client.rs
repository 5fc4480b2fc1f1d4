use std::{fmt, sync::Arc, time::Duration};

use crate::server::{
    error::{generation::GenerationError, Error},
    generation::{
        model::{Job, JobRequest},
        GenerationConfig,
    },
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the generation job service. Cheap to clone.
#[derive(Clone)]
pub struct GenerationClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner { http, config }),
        })
    }

    /// Whether an API key is available. Without one every call fails before touching the network.
    pub fn is_configured(&self) -> bool {
        self.inner.config.api_key.is_some()
    }

    pub fn text_model(&self) -> &str {
        &self.inner.config.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.inner.config.image_model
    }

    /// Whether both handles share the same underlying client.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Submit a job, returning its initial document.
    pub async fn submit(&self, request: &JobRequest) -> Result<Job, Error> {
        let api_key = self.api_key()?;
        let url = self.url("v1/jobs");

        tracing::debug!(model = %request.model, kind = ?request.kind, "Submitting generation job");

        let response = self
            .inner
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_job(response).await
    }

    /// Fetch the current document of a job.
    pub async fn job(&self, job_id: &str) -> Result<Job, Error> {
        let api_key = self.api_key()?;
        let url = self.url(&format!("v1/jobs/{}", job_id));

        let response = self
            .inner
            .http
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await?;

        Self::parse_job(response).await
    }

    fn api_key(&self) -> Result<&str, Error> {
        self.inner
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured.into())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.config.api_url.trim_end_matches('/'), path)
    }

    async fn parse_job(response: reqwest::Response) -> Result<Job, Error> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());

            return Err(GenerationError::ServiceStatus {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response.json::<Job>().await?)
    }
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
