use super::ImageService;
use crate::models::{ImagePayload, DEFAULT_MAX_IMAGE_DIMENSION};
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone)]
pub struct ImageProcessor {
    max_dimension: u32,
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_DIMENSION)
    }
}

impl ImageProcessor {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Decodes, orients, bounds and re-encodes `bytes` as JPEG.
    ///
    /// Already-upright JPEGs within bounds are passed through untouched.
    pub fn prepare_bytes(&self, bytes: &[u8]) -> Result<ImagePayload> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format();
        let mut decoder = reader.into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut img = DynamicImage::from_decoder(decoder)?;

        let within_bounds = img.width() <= self.max_dimension && img.height() <= self.max_dimension;
        if format == Some(ImageFormat::Jpeg)
            && within_bounds
            && orientation == Orientation::NoTransforms
        {
            tracing::debug!(
                "Image is an upright {}x{} JPEG, sending as is",
                img.width(),
                img.height()
            );
            return Ok(ImagePayload::jpeg(bytes));
        }

        img.apply_orientation(orientation);
        if !within_bounds {
            tracing::debug!(
                "Downscaling {}x{} image to fit {}px",
                img.width(),
                img.height(),
                self.max_dimension
            );
            img = img.resize(
                self.max_dimension,
                self.max_dimension,
                image::imageops::FilterType::Lanczos3,
            );
        }

        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))?;

        Ok(ImagePayload::jpeg(&jpeg))
    }
}

#[async_trait]
impl ImageService for ImageProcessor {
    async fn prepare_image(&self, path: &Path) -> Result<ImagePayload> {
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!("Read {} ({} bytes)", path.display(), bytes.len());

        let processor = self.clone();
        tokio::task::spawn_blocking(move || processor.prepare_bytes(&bytes))
            .await
            .map_err(|e| Error::Invariant(format!("Image processing task join error: {}", e)))?
    }
}
