use super::ImageService;
use crate::models::ImagePayload;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockImageProcessor {
    process_count: Arc<Mutex<usize>>,
    last_path: Arc<Mutex<Option<PathBuf>>>,
    payload: ImagePayload,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageProcessor {
    pub fn new() -> Self {
        Self {
            process_count: Arc::new(Mutex::new(0)),
            last_path: Arc::new(Mutex::new(None)),
            // JPEG magic bytes
            payload: ImagePayload::jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_process_count(&self) -> usize {
        *self.process_count.lock().unwrap()
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().unwrap().clone()
    }
}

impl Default for MockImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockImageProcessor {
    async fn prepare_image(&self, path: &Path) -> Result<ImagePayload> {
        *self.process_count.lock().unwrap() += 1;
        *self.last_path.lock().unwrap() = Some(path.to_path_buf());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("mock image not found: {}", path.display()),
            )));
        }

        Ok(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_image_processor() {
        let processor = MockImageProcessor::new();

        let payload = processor.prepare_image(Path::new("board.jpg")).await.unwrap();
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(processor.get_process_count(), 1);
        assert_eq!(processor.last_path(), Some(PathBuf::from("board.jpg")));
    }

    #[tokio::test]
    async fn test_mock_image_processor_failure() {
        let processor = MockImageProcessor::new().with_failure(true);

        let result = processor.prepare_image(Path::new("board.jpg")).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(processor.get_process_count(), 1);
    }
}
