//! HTTP client for the local bot agent API.
//!
//! Every endpoint lives under `http://{host}:{port}/api`. The client never
//! retries; a single bounded timeout applies to each request.

use crate::error::AgentError;
use crate::traits::ControlPlane;
use crate::types::{ErrorBody, LogEntry, LogLevel, StatusUpdate};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

/// Request timeout used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "botkit/0.1";

/// Strict client for the bot agent API.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    base_url: Url,
    endpoint: String,
}

impl AgentClient {
    /// Create a client for the agent at `host:port`.
    ///
    /// This only validates the address and builds the HTTP client; it does not
    /// contact the agent.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, AgentError> {
        let raw = format!("http://{host}:{port}/api");
        let base_url = Url::parse(&raw).map_err(|e| AgentError::InvalidAddress(format!("{raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AgentError::InvalidAddress(raw));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AgentError::InvalidAddress(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{host}:{port}"),
            base_url,
        })
    }

    /// Base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `segments` under the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, AgentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AgentError::InvalidAddress(self.base_url.to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Fetch an asset value by key (`GET /assets/{key}`).
    pub async fn get_asset(&self, key: &str) -> Result<String, AgentError> {
        let url = self.url(&["assets", key])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AgentError::Unreachable)?;

        match response.status() {
            StatusCode::OK => response.text().await.map_err(AgentError::Unreachable),
            StatusCode::NOT_FOUND => {
                let message = error_message(response)
                    .await
                    .unwrap_or_else(|| "Asset not found".to_string());
                Err(AgentError::AssetNotFound(message))
            }
            StatusCode::FORBIDDEN => Err(AgentError::Unauthorized(key.to_string())),
            status => Err(AgentError::RequestFailed {
                status: status.as_u16(),
                message: error_message(response)
                    .await
                    .unwrap_or_else(|| format!("Failed to retrieve asset: {}", status.as_u16())),
            }),
        }
    }

    /// List every asset key available to this bot (`GET /assets`).
    pub async fn list_asset_keys(&self) -> Result<Vec<String>, AgentError> {
        let url = self.url(&["assets"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AgentError::Unreachable)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AgentError::RequestFailed {
                status: status.as_u16(),
                message: error_message(response)
                    .await
                    .unwrap_or_else(|| format!("Failed to retrieve assets: {}", status.as_u16())),
            });
        }

        let body = response.text().await.map_err(AgentError::Unreachable)?;
        serde_json::from_str(&body)
            .map_err(|e| AgentError::InvalidResponse(format!("expected a JSON array of keys: {e}")))
    }

    /// Push a status string (`POST /status` or `POST /execution/{id}/status`).
    ///
    /// Returns whether the agent acknowledged with 200. Only transport
    /// failures are errors.
    pub async fn update_status(
        &self,
        status: &str,
        execution_id: Option<&str>,
    ) -> Result<bool, AgentError> {
        let url = match execution_id {
            Some(id) => self.url(&["execution", id, "status"])?,
            None => self.url(&["status"])?,
        };
        let body = StatusUpdate {
            status: status.to_string(),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(AgentError::Unreachable)?;

        Ok(response.status() == StatusCode::OK)
    }

    /// Forward a log line (`POST /log`). Failures are logged locally and
    /// reported as `false`.
    pub async fn log(&self, message: &str, level: LogLevel) -> bool {
        let url = match self.url(&["log"]) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to send log: {e}");
                return false;
            }
        };
        let body = LogEntry {
            message: message.to_string(),
            level,
        };

        match self.client.post(url).json(&body).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::warn!("Failed to send log: {e}");
                false
            }
        }
    }
}

/// Pull the agent's `error` field out of a failed response, if present.
async fn error_message(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    ErrorBody::message_from(&body)
}

#[async_trait]
impl ControlPlane for AgentClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_asset(&self, key: &str) -> Result<String, AgentError> {
        AgentClient::get_asset(self, key).await
    }

    async fn list_asset_keys(&self) -> Result<Vec<String>, AgentError> {
        AgentClient::list_asset_keys(self).await
    }

    async fn update_status(
        &self,
        status: &str,
        execution_id: Option<&str>,
    ) -> Result<bool, AgentError> {
        AgentClient::update_status(self, status, execution_id).await
    }

    async fn log(&self, message: &str, level: LogLevel) -> bool {
        AgentClient::log(self, message, level).await
    }
}
