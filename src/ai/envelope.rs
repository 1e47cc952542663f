//! Locating the generated text in a provider reply.
//!
//! Each location is read on its own from the raw JSON body, so a field with
//! an unexpected type elsewhere in the envelope cannot hide a match.

use serde_json::Value;

fn non_empty(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

/// Chat completions: `choices[0].message.content`.
pub fn chat_text(body: &Value) -> Option<&str> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .and_then(non_empty)
}

/// Anthropic messages: `content[0].text`.
pub fn anthropic_text(body: &Value) -> Option<&str> {
    body["content"][0]["text"].as_str().and_then(non_empty)
}

/// OpenAI Responses: top-level `output_text`, then the first `output` item
/// whose content yields text, then the chat-style `choices` fallback.
pub fn responses_text(body: &Value) -> Option<&str> {
    body["output_text"]
        .as_str()
        .and_then(non_empty)
        .or_else(|| output_item_text(body))
        .or_else(|| chat_text(body))
}

/// An item's content is either a list of typed parts, of which only
/// `output_text` counts, or a plain string.
fn output_item_text(body: &Value) -> Option<&str> {
    body["output"].as_array()?.iter().find_map(|item| {
        let text = match &item["content"] {
            Value::String(text) => Some(text.as_str()),
            Value::Array(parts) => parts
                .iter()
                .find(|part| part["type"] == "output_text")
                .and_then(|part| part["text"].as_str()),
            _ => None,
        };
        text.and_then(non_empty)
    })
}

/// Why generation stopped, for the chat and Anthropic envelopes.
pub fn stop_reason(body: &Value) -> Option<&str> {
    body["choices"][0]["finish_reason"]
        .as_str()
        .or_else(|| body["stop_reason"].as_str())
}
