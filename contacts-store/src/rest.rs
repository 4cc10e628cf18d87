//! HTTP client for the contact resource.

use async_trait::async_trait;
use contacts_fields::{Record, RecordId};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::RecordStore;

/// Default resource URL, matching the shell server's defaults.
pub const DEFAULT_RESOURCE_URL: &str = "http://127.0.0.1:3000/api/contact";

/// Extract a human-readable message from an error body.
///
/// Tries `error`, then `message`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    body.to_string()
}

/// Record store backed by the `/api/contact/:id` REST resource.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    resource_url: String,
}

impl Default for RestStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_URL)
    }
}

impl RestStore {
    /// Create a client for the resource collection at `resource_url`
    /// (e.g. `http://host:3000/api/contact`).
    pub fn new(resource_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), resource_url)
    }

    pub fn with_client(client: Client, resource_url: impl Into<String>) -> Self {
        let resource_url = resource_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            resource_url,
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn member_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.resource_url, id)
    }

    /// Map an HTTP response to a `StoreError` based on status code.
    async fn check_response(
        &self,
        response: reqwest::Response,
        id: Option<RecordId>,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);

        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(StoreError::NotFound { id }),
            _ => Err(StoreError::rejected(status.as_u16(), message)),
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    #[tracing::instrument(skip(self))]
    async fn query(&self) -> Result<Vec<Record>> {
        let response = self.client.get(&self.resource_url).send().await?;
        let response = self.check_response(response, None).await?;
        let records: Vec<Record> = response.json().await?;
        debug!(count = records.len(), "queried records");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: RecordId) -> Result<Record> {
        let response = self.client.get(self.member_url(id)).send().await?;
        let response = self.check_response(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, record), fields(fields = record.len()))]
    async fn save(&self, record: &Record) -> Result<Record> {
        let response = self
            .client
            .post(&self.resource_url)
            .json(record)
            .send()
            .await?;
        let response = self.check_response(response, None).await?;
        let saved: Record = response.json().await?;
        debug!(id = ?saved.id(), "record saved");
        Ok(saved)
    }

    #[tracing::instrument(skip(self, record), fields(id = ?record.id()))]
    async fn update(&self, record: &Record) -> Result<Record> {
        let id = record.id().ok_or_else(|| StoreError::missing_id("update"))?;
        let response = self
            .client
            .put(self.member_url(id))
            .json(record)
            .send()
            .await?;
        let response = self.check_response(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, record), fields(id = ?record.id()))]
    async fn delete(&self, record: &Record) -> Result<()> {
        let id = record.id().ok_or_else(|| StoreError::missing_id("delete"))?;
        let response = self.client.delete(self.member_url(id)).send().await?;
        self.check_response(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_prefers_error_key() {
        assert_eq!(
            extract_error_message(r#"{"error":"no such contact","message":"x"}"#),
            "no such contact"
        );
        assert_eq!(extract_error_message(r#"{"message":"bad"}"#), "bad");
        assert_eq!(extract_error_message("plain"), "plain");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let store = RestStore::new("http://localhost:3000/api/contact/");
        assert_eq!(store.resource_url(), "http://localhost:3000/api/contact");
        assert_eq!(
            store.member_url(RecordId(4)),
            "http://localhost:3000/api/contact/4"
        );
    }
}
