//! Image preparation before upload
//!
//! Turns a captured photo into the base64 JPEG payload the vision providers
//! expect: EXIF orientation applied, longest edge bounded, JPEG re-encoded.

pub mod mock;
pub mod processor;

pub use mock::MockImageProcessor;
pub use processor::ImageProcessor;

use crate::models::ImagePayload;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn prepare_image(&self, path: &Path) -> Result<ImagePayload>;
}
