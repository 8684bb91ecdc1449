//! HTTP implementation of [`ChatBackend`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use askdb_core::config::BackendConfig;
use askdb_core::{AskdbError, Result};

use crate::backend::{ChatBackend, ChatRequest, ClearMemoryReply, RawReply};
use crate::error::ClientError;

/// Talks JSON to the answering service at a configured base URL.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Builds a backend from configuration. When `request_timeout_secs` is
    /// unset, requests wait as long as the transport does.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AskdbError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> std::result::Result<RawReply, ClientError> {
        debug!(chars = request.message.len(), "Sending chat request");

        let response = self
            .client
            .post(self.url("/chat"))
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(ClientError::from_reqwest)?;
        debug!("Chat reply received");
        Ok(RawReply(body))
    }

    async fn health(&self) -> std::result::Result<(), ClientError> {
        let response = self
            .client
            .get(self.url("/health"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn clear_memory(&self) -> std::result::Result<ClearMemoryReply, ClientError> {
        let response = self
            .client
            .post(self.url("/clear-memory"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ClearMemoryReply>()
            .await
            .map_err(ClientError::from_reqwest)
    }
}

/// Pulls the most useful message out of an error response body. FastAPI-style
/// services put theirs under `detail`; otherwise the raw body text stands in,
/// and an empty body falls back to the status line.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let trimmed = body.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        if let Some(Value::String(detail)) = map.get("detail") {
            return detail.clone();
        }
    }

    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
