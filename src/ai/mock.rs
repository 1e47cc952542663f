use super::BoardReader;
use crate::models::ImagePayload;
use crate::{fen, Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone)]
pub struct MockBoardReader {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<(u16, String)>>>,
    call_count: Arc<Mutex<usize>>,
    last_image: Arc<Mutex<Option<ImagePayload>>>,
    gate: Option<Arc<Notify>>,
}

impl MockBoardReader {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            last_image: Arc::new(Mutex::new(None)),
            gate: None,
        }
    }

    /// Queues a raw model reply; replies are cycled through in order.
    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Every call fails as if the provider returned `status` with `body`.
    pub fn with_api_failure(self, status: u16, body: String) -> Self {
        *self.failure.lock().unwrap() = Some((status, body));
        self
    }

    /// Each call waits for a `notify_one` on `gate` before replying.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_image(&self) -> Option<ImagePayload> {
        self.last_image.lock().unwrap().clone()
    }
}

impl Default for MockBoardReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardReader for MockBoardReader {
    fn provider(&self) -> &'static str {
        "Mock"
    }

    async fn read_board(&self, image: &ImagePayload) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_image.lock().unwrap() = Some(image.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some((status, body)) = self.failure.lock().unwrap().clone() {
            return Err(Error::Api {
                provider: "Mock",
                status,
                body,
            });
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            Ok("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(fen::extract_fen(&responses[index]))
        }
    }
}
