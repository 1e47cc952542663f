//! Chess diagram reader - turns a photo of a chess position into a FEN
//!
//! The image is sent to a multimodal vision API; the model's free-form reply
//! is searched for a FEN, and the outcome is classified for display.

pub mod ai;
pub mod app;
pub mod error;
pub mod fen;
pub mod image;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
pub use fen::{extract_fen, FenString};
pub use models::{AnalysisResult, Config, ImagePayload, Provider};
