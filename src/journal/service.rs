use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace};

use super::error::JournalError;
use super::models::{
    DeleteResponse, EntryQuery, EntryRecord, HealthResponse, SaveEntryRequest, SaveOutcome,
};

/// The remote service that stores entries and analyzes them
#[async_trait]
pub trait JournalService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Store one entry. Exactly one request, no retry.
    async fn save_entry(&self, content: &str) -> Result<SaveOutcome, JournalError>;

    /// Past entries, newest first, narrowed by search term and date range
    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<EntryRecord>, JournalError>;

    /// Remove one stored entry and its analysis
    async fn delete_entry(&self, id: &str) -> Result<(), JournalError>;

    /// Ask the service root for its greeting
    async fn health(&self) -> Result<String, JournalError>;
}

/// Connection settings for the HTTP service
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`
    pub base_url: String,

    /// Per-request timeout. None leaves it to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: None,
        }
    }
}

/// reqwest implementation of the journal service
pub struct HttpJournalService {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl HttpJournalService {
    pub fn with_config(config: ServiceConfig) -> Result<Self, JournalError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("checkin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and hand back the body of a 2xx response
    async fn fetch_body(&self, request: reqwest::RequestBuilder) -> Result<String, JournalError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", self.name(), status);
            return Err(JournalError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl JournalService for HttpJournalService {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn save_entry(&self, content: &str) -> Result<SaveOutcome, JournalError> {
        let url = self.endpoint("journal-entry");
        trace!("POST {} ({} chars)", url, content.len());

        let body = self
            .fetch_body(self.client.post(&url).json(&SaveEntryRequest { content }))
            .await?;
        SaveOutcome::decode(&body)
    }

    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<EntryRecord>, JournalError> {
        let url = self.endpoint("entries");
        let params = query.params();
        trace!("GET {} {:?}", url, params);

        let body = self
            .fetch_body(self.client.get(&url).query(&params))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_entry(&self, id: &str) -> Result<(), JournalError> {
        let url = self.endpoint(&format!("entries/{}", id));
        trace!("DELETE {}", url);

        let body = self.fetch_body(self.client.delete(&url)).await?;
        let response: DeleteResponse = serde_json::from_str(&body)?;
        match response.status.as_str() {
            "success" => Ok(()),
            other => Err(JournalError::Unrecognized(other.to_string())),
        }
    }

    async fn health(&self) -> Result<String, JournalError> {
        let url = self.endpoint("");
        let body = self.fetch_body(self.client.get(&url)).await?;
        let health: HealthResponse = serde_json::from_str(&body)?;
        Ok(health.message)
    }
}
