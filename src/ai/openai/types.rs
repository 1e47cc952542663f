//! Request payloads for the OpenAI-compatible chat completions and OpenAI
//! Responses APIs. Replies are read field by field in [`crate::ai::envelope`].

use serde::Serialize;

/// Request body for chat completions (xAI, Z.ai).
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Message content union used in chat requests.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatMessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

/// One content segment in multipart message input.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

/// Image URL wrapper; `detail` is omitted for providers that reject it.
#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: ChatMessageContent,
}

/// Request body for the Responses API.
#[derive(Debug, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub max_output_tokens: u32,
    pub input: Vec<ResponsesInput>,
}

#[derive(Debug, Serialize)]
pub struct ResponsesInput {
    pub role: String,
    pub content: Vec<InputPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPart {
    InputImage { image_url: String, detail: String },
    InputText { text: String },
}
