//! Vision provider integration
//!
//! Each provider turns a chess diagram image into text through its own
//! multimodal API. Readers hide the request and envelope differences behind
//! [`BoardReader`] and run the reply through [`crate::fen::extract_fen`].

pub mod anthropic;
pub mod envelope;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicMessagesReader;
pub use mock::MockBoardReader;
pub use openai::{ChatCompletionsReader, ChatProfile, OpenAiResponsesReader};

use crate::models::{Config, ImagePayload, Provider};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BoardReader: Send + Sync {
    /// Display name used in logs and error messages.
    fn provider(&self) -> &'static str;

    /// One request to the provider; returns the extracted FEN or the trimmed reply text.
    async fn read_board(&self, image: &ImagePayload) -> Result<String>;
}

/// Model used when the config does not override it.
pub fn default_model(provider: Provider) -> &'static str {
    match provider {
        Provider::Xai => openai::chat::XAI.default_model,
        Provider::Anthropic => anthropic::messages::DEFAULT_MODEL,
        Provider::OpenAi => openai::responses::DEFAULT_MODEL,
        Provider::Zai => openai::chat::ZAI.default_model,
    }
}

/// Builds the reader for the configured provider.
///
/// Fails with a config error when that provider's API key is missing.
pub fn build_reader(config: &Config, http_client: reqwest::Client) -> Result<Box<dyn BoardReader>> {
    let provider = config.provider;
    let api_key = config.api_key(provider)?.to_string();
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| default_model(provider).to_string());

    tracing::info!("Vision provider: {} (model: {})", provider, model);

    let reader: Box<dyn BoardReader> = match provider {
        Provider::Xai | Provider::Zai => {
            let profile = if provider == Provider::Xai {
                openai::chat::XAI
            } else {
                openai::chat::ZAI
            };
            let mut reader = ChatCompletionsReader::new_with_client(profile, api_key, model, http_client)
                .with_timeout(config.timeout);
            if let Some(base_url) = &config.base_url {
                reader = reader.with_base_url(base_url.clone());
            }
            Box::new(reader)
        }
        Provider::Anthropic => {
            let mut reader = AnthropicMessagesReader::new_with_client(api_key, model, http_client)
                .with_timeout(config.timeout);
            if let Some(base_url) = &config.base_url {
                reader = reader.with_base_url(base_url.clone());
            }
            Box::new(reader)
        }
        Provider::OpenAi => {
            let mut reader = OpenAiResponsesReader::new_with_client(api_key, model, http_client)
                .with_timeout(config.timeout);
            if let Some(base_url) = &config.base_url {
                reader = reader.with_base_url(base_url.clone());
            }
            Box::new(reader)
        }
    };

    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_reader_requires_selected_key() {
        let config = Config {
            provider: Provider::Zai,
            openai_api_key: Some("unused".to_string()),
            ..Config::default()
        };

        let err = build_reader(&config, reqwest::Client::new()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("ZAI_API_KEY"));
    }

    #[test]
    fn test_build_reader_selects_provider() {
        for provider in Provider::ALL {
            let config = Config {
                provider,
                xai_api_key: Some("k".to_string()),
                anthropic_api_key: Some("k".to_string()),
                openai_api_key: Some("k".to_string()),
                zai_api_key: Some("k".to_string()),
                ..Config::default()
            };

            let reader = build_reader(&config, reqwest::Client::new()).unwrap();
            assert_eq!(reader.provider().to_lowercase().replace('.', ""), provider.as_str());
        }
    }

    #[tokio::test]
    async fn test_build_reader_honors_base_url_and_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer xai-key"))
            .and(wiremock::matchers::body_string_contains("\"model\":\"grok-custom\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "FEN: 8/8/8/8/8/8/8/8 w - - 0 1" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            provider: Provider::Xai,
            model: Some("grok-custom".to_string()),
            base_url: Some(server.uri()),
            xai_api_key: Some("xai-key".to_string()),
            ..Config::default()
        };

        let reader = build_reader(&config, reqwest::Client::new()).unwrap();
        let image = ImagePayload::jpeg_base64("aGVsbG8=".to_string());
        assert_eq!(reader.read_board(&image).await.unwrap(), "8/8/8/8/8/8/8/8 w - - 0 1");
    }
}
