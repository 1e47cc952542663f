use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const PROVIDER: &str = "Anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Lightweight Anthropic REST client: `x-api-key` auth plus a pinned API version header.
pub struct AnthropicHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    timeout: Option<Duration>,
}

impl AnthropicHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Calls the `/v1/messages` endpoint and returns the raw envelope.
    pub async fn messages<Req: Serialize>(&self, request: &Req) -> Result<Value> {
        let url = format!("{}/v1/messages", self.base_url);
        tracing::debug!("Sending request to Anthropic ({})", url);

        let mut builder = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to Anthropic: {}", e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Anthropic API error (status {}): {}", status, error_text);
            return Err(Error::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}\nBody: {}", e, body);
            Error::InvalidResponse(format!("{} ({})", body, e))
        })
    }
}
