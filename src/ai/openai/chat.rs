use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, ImageUrl, MessagePart};
use crate::ai::{envelope, BoardReader};
use crate::models::ImagePayload;
use crate::{fen, prompts, Error, Result};
use async_trait::async_trait;

/// Everything that differs between the chat-completions providers.
#[derive(Debug, Clone, Copy)]
pub struct ChatProfile {
    pub provider: &'static str,
    pub base_url: &'static str,
    pub path: &'static str,
    pub default_model: &'static str,
    pub max_tokens: u32,
    pub temperature: f64,
    /// `None` drops the `detail` field from the image block entirely.
    pub image_detail: Option<&'static str>,
    pub system_prompt: Option<&'static str>,
    pub user_prompt: &'static str,
}

/// xAI Grok vision: reads rank by rank in a system prompt, then emits a `FEN:` line.
pub const XAI: ChatProfile = ChatProfile {
    provider: "xAI",
    base_url: "https://api.x.ai",
    path: "/v1/chat/completions",
    default_model: "grok-2-vision-1212",
    max_tokens: 800,
    temperature: 0.0,
    image_detail: Some("high"),
    system_prompt: Some(prompts::XAI_SYSTEM),
    user_prompt: prompts::XAI_USER,
};

/// Z.ai GLM vision.
pub const ZAI: ChatProfile = ChatProfile {
    provider: "Z.ai",
    base_url: "https://api.z.ai",
    path: "/api/paas/v4/chat/completions",
    default_model: "glm-4.6v",
    max_tokens: 200,
    temperature: 0.1,
    image_detail: None,
    system_prompt: None,
    user_prompt: prompts::ZAI,
};

pub struct ChatCompletionsReader {
    http: OpenAiHttpClient,
    profile: ChatProfile,
    model: String,
}

impl ChatCompletionsReader {
    pub fn new(profile: ChatProfile, api_key: String, model: String) -> Self {
        Self::new_with_client(profile, api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(
        profile: ChatProfile,
        api_key: String,
        model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(
                profile.provider,
                api_key,
                profile.base_url,
                client,
            ),
            profile,
            model,
        }
    }

    pub fn xai(api_key: String, model: String) -> Self {
        Self::new(XAI, api_key, model)
    }

    pub fn zai(api_key: String, model: String) -> Self {
        Self::new(ZAI, api_key, model)
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    fn build_request(&self, image: &ImagePayload) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = self.profile.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: ChatMessageContent::Text(system.trim().to_string()),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: ChatMessageContent::Parts(vec![
                MessagePart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_uri(),
                        detail: self.profile.image_detail.map(str::to_string),
                    },
                },
                MessagePart::Text {
                    text: self.profile.user_prompt.trim().to_string(),
                },
            ]),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.profile.temperature,
            max_tokens: self.profile.max_tokens,
        }
    }
}

#[async_trait]
impl BoardReader for ChatCompletionsReader {
    fn provider(&self) -> &'static str {
        self.profile.provider
    }

    async fn read_board(&self, image: &ImagePayload) -> Result<String> {
        tracing::debug!(
            "Reading board via {} (model: {}, {} base64 chars)",
            self.profile.provider,
            self.model,
            image.data().len()
        );

        let request = self.build_request(image);
        let body = self.http.post(self.profile.path, &request).await?;

        if envelope::stop_reason(&body) == Some("length") {
            tracing::warn!(
                "{} reply hit the token limit; FEN may be truncated",
                self.profile.provider
            );
        }

        let text = envelope::chat_text(&body).ok_or_else(|| {
            tracing::error!("Unrecognized {} response: {}", self.profile.provider, body);
            Error::InvalidResponse(body.to_string())
        })?;

        Ok(fen::extract_fen(text))
    }
}
