use super::client::AnthropicHttpClient;
use super::types::{ContentBlock, ImageSource, Message, MessagesRequest};
use crate::ai::{envelope, BoardReader};
use crate::models::ImagePayload;
use crate::{fen, prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "claude-opus-4-5-20251101";
const MAX_TOKENS: u32 = 150;

pub struct AnthropicMessagesReader {
    http: AnthropicHttpClient,
    model: String,
}

impl AnthropicMessagesReader {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: AnthropicHttpClient::new_with_client(api_key, client),
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
impl BoardReader for AnthropicMessagesReader {
    fn provider(&self) -> &'static str {
        "Anthropic"
    }

    async fn read_board(&self, image: &ImagePayload) -> Result<String> {
        tracing::debug!("Reading board via Anthropic (model: {})", self.model);

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: image.mime_type().to_string(),
                            data: image.data().to_string(),
                        },
                    },
                    ContentBlock::Text {
                        text: prompts::ANTHROPIC.trim().to_string(),
                    },
                ],
            }],
        };

        let body = self.http.messages(&request).await?;

        if envelope::stop_reason(&body) == Some("max_tokens") {
            tracing::warn!("Anthropic reply hit the token limit; FEN may be truncated");
        }

        let text = envelope::anthropic_text(&body).ok_or_else(|| {
            tracing::error!("Unrecognized Anthropic response: {}", body);
            Error::InvalidResponse(body.to_string())
        })?;

        Ok(fen::extract_fen(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn image() -> ImagePayload {
        ImagePayload::jpeg_base64("aGVsbG8=".to_string())
    }

    fn make_reader(server: &MockServer) -> AnthropicMessagesReader {
        AnthropicMessagesReader::new("sk-ant-test".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_returns_pre_isolated_fen() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": format!("{}\n", START) }],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fen = make_reader(&server).read_board(&image()).await.unwrap();
        assert_eq!(fen, START);
    }

    #[tokio::test]
    async fn test_request_uses_base64_image_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(serde_json::json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 150,
                "messages": [{
                    "role": "user",
                    "content": [{
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": "image/jpeg",
                            "data": "aGVsbG8="
                        }
                    }, {
                        "type": "text",
                        "text": prompts::ANTHROPIC.trim()
                    }]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{ "type": "text", "text": START }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        make_reader(&server).read_board(&image()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unexpected_sibling_fields_do_not_hide_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    { "type": "text", "text": START },
                    { "type": "tool_use", "text": null, "input": {} }
                ],
                "stop_reason": null,
                "usage": "n/a"
            })))
            .mount(&server)
            .await;

        let fen = make_reader(&server).read_board(&image()).await.unwrap();
        assert_eq!(fen, START);
    }

    #[tokio::test]
    async fn test_empty_content_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": []
            })))
            .mount(&server)
            .await;

        let err = make_reader(&server).read_board(&image()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_api_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded_error"))
            .mount(&server)
            .await;

        let err = make_reader(&server).read_board(&image()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Anthropic API request failed: 529 - overloaded_error"
        );
    }
}
