//! HTTP implementation of [`ChatBackend`] using `reqwest`.
//!
//! All four endpoints are plain JSON over HTTP. A non-success status is an
//! error for every call, whatever the body says.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::client::{BackendError, ChatBackend};
use super::types::{
    ChatRequest, ChatResponse, HistoryEntry, HistoryResponse, NewChatResponse, SidebarData,
};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url`. `timeout` of `None` means
    /// requests may wait forever, matching a backend with no deadline.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build configured HTTP client ({}), using defaults", e);
            reqwest::Client::new()
        });

        info!("HTTP backend at {} (timeout: {:?})", base_url, timeout);
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Send a prepared request and decode a JSON body, mapping each failure
    /// class onto its `BackendError` variant.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error on {}: {} - {}", endpoint, status.as_u16(), message);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn create_session(&self) -> Result<Option<String>, BackendError> {
        let request = self.client.post(self.url("new_chat"));
        let response: NewChatResponse = self.execute("new_chat", request).await?;
        Ok(response.session_id)
    }

    async fn fetch_sidebar(&self) -> Result<SidebarData, BackendError> {
        let request = self.client.get(self.url("get_sidebar_data"));
        self.execute("get_sidebar_data", request).await
    }

    async fn fetch_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        let request = self
            .client
            .get(self.url("get_chat_history"))
            .query(&[("session_id", session_id)]);
        let response: HistoryResponse = self.execute("get_chat_history", request).await?;
        Ok(response.messages)
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        info!(
            "Sending message: len={}, session={:?}",
            request.message.len(),
            request.session_id
        );
        let builder = self.client.post(self.url("chat")).json(request);
        self.execute("chat", builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:5000/", None);
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.url("chat"), "http://localhost:5000/chat");
    }

    #[test]
    fn test_display_backend_errors() {
        let err = BackendError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 503): down");
        assert_eq!(
            BackendError::Network("refused".to_string()).to_string(),
            "network error: refused"
        );
    }
}
