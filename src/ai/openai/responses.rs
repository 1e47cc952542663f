use super::client::OpenAiHttpClient;
use super::types::{InputPart, ResponsesInput, ResponsesRequest};
use crate::ai::{envelope, BoardReader};
use crate::models::ImagePayload;
use crate::{fen, prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const PROVIDER: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const RESPONSES_PATH: &str = "/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-5.2";
const MAX_OUTPUT_TOKENS: u32 = 150;

pub struct OpenAiResponsesReader {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiResponsesReader {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(PROVIDER, api_key, DEFAULT_BASE_URL, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl BoardReader for OpenAiResponsesReader {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn read_board(&self, image: &ImagePayload) -> Result<String> {
        tracing::debug!(
            "Reading board via OpenAI Responses API (model: {})",
            self.model
        );

        let request = ResponsesRequest {
            model: self.model.clone(),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            input: vec![ResponsesInput {
                role: "user".to_string(),
                content: vec![
                    InputPart::InputImage {
                        image_url: image.data_uri(),
                        detail: "high".to_string(),
                    },
                    InputPart::InputText {
                        text: prompts::OPENAI.trim().to_string(),
                    },
                ],
            }],
        };

        let body = self.http.post(RESPONSES_PATH, &request).await?;
        tracing::debug!("OpenAI response: {}", body);

        let text = envelope::responses_text(&body).ok_or_else(|| {
            tracing::error!("Unrecognized OpenAI response: {}", body);
            Error::InvalidResponse(body.to_string())
        })?;

        Ok(fen::extract_fen(text))
    }
}
