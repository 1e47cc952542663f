use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Bearer-token JSON client shared by the OpenAI-compatible providers.
///
/// Returns the raw envelope so callers can try several response shapes and
/// dump the body when none of them match.
pub struct OpenAiHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    provider: &'static str,
    timeout: Option<Duration>,
}

impl OpenAiHttpClient {
    pub fn new_with_client(
        provider: &'static str,
        api_key: String,
        base_url: &str,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider,
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

    pub async fn post<Req: Serialize>(&self, path: &str, request: &Req) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Sending request to {} ({})", self.provider, url);

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", self.provider, e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!(
                "{} API error (status {}): {}",
                self.provider,
                status,
                error_text
            );
            return Err(Error::Api {
                provider: self.provider,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse {} response: {}\nBody: {}",
                self.provider,
                e,
                body
            );
            Error::InvalidResponse(format!("{} ({})", body, e))
        })
    }
}
