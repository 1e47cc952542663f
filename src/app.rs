//! Application orchestration for reading a chess diagram into a FEN.

use crate::ai::{self, BoardReader};
use crate::image::{ImageProcessor, ImageService};
use crate::models::{AnalysisResult, Config, ImagePayload};
use crate::Result;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

pub const ALREADY_ANALYZING: &str = "analysis already in progress";

/// Runs one analysis at a time: prepare the image, ask the provider, classify the reply.
pub struct App {
    reader: Box<dyn BoardReader>,
    image: Box<dyn ImageService>,
    analyzing: AtomicBool,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub reader: Box<dyn BoardReader>,
    pub image: Box<dyn ImageService>,
}

/// Holds the "analyzing" flag for the duration of one analysis, including
/// when the analysis future is dropped mid-request.
struct AnalyzingGuard<'a>(&'a AtomicBool);

impl<'a> AnalyzingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            reader: services.reader,
            image: services.image,
            analyzing: AtomicBool::new(false),
        }
    }

    /// Construct an app for the configured provider.
    ///
    /// Fails before any network call when the provider's API key is missing.
    pub fn new(config: &Config) -> Result<Self> {
        let reader = ai::build_reader(config, reqwest::Client::new())?;
        let image = Box::new(ImageProcessor::new(config.max_image_dimension));

        Ok(Self::with_services(AppServices { reader, image }))
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Analyze the photo at `path`.
    pub async fn analyze_file(&self, path: &Path) -> AnalysisResult {
        let Some(_guard) = AnalyzingGuard::acquire(&self.analyzing) else {
            warn!("Ignoring {}: {}", path.display(), ALREADY_ANALYZING);
            return AnalysisResult::Failed(ALREADY_ANALYZING.to_string());
        };

        info!("Preparing image {}", path.display());
        let payload = match self.image.prepare_image(path).await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to prepare image {}: {}", path.display(), e);
                return e.into();
            }
        };

        self.read(&payload).await
    }

    /// Analyze an image that is already encoded.
    pub async fn analyze_payload(&self, payload: &ImagePayload) -> AnalysisResult {
        let Some(_guard) = AnalyzingGuard::acquire(&self.analyzing) else {
            warn!("Ignoring image: {}", ALREADY_ANALYZING);
            return AnalysisResult::Failed(ALREADY_ANALYZING.to_string());
        };

        self.read(payload).await
    }

    async fn read(&self, payload: &ImagePayload) -> AnalysisResult {
        info!(
            "Sending {} image to {} ({} base64 chars)",
            payload.mime_type(),
            self.reader.provider(),
            payload.data().len()
        );

        match self.reader.read_board(payload).await {
            Ok(text) => {
                let result = AnalysisResult::from_text(&text);
                match &result {
                    AnalysisResult::Fen(fen) => info!("FEN result: {}", fen),
                    AnalysisResult::Unrecognized(text) => {
                        warn!("No FEN found in {} reply: {}", self.reader.provider(), text)
                    }
                    AnalysisResult::Failed(message) => {
                        warn!("{} reported an error: {}", self.reader.provider(), message)
                    }
                }
                result
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                e.into()
            }
        }
    }
}
