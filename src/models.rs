//! Data models and structures
//!
//! Defines the image payload sent to vision providers, the tagged outcome of
//! an analysis, provider selection, and environment configuration.

use crate::fen::FenString;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Reserved prefix marking a displayed result as a failure.
pub const ERROR_PREFIX: &str = "ERROR:";

pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Xai,
    Anthropic,
    OpenAi,
    Zai,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Xai,
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Zai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Xai => "xai",
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Zai => "zai",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Xai => "XAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Zai => "ZAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xai" | "grok" => Ok(Provider::Xai),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "zai" | "glm" => Ok(Provider::Zai),
            other => Err(Error::Config(format!(
                "Unknown vision provider '{}'. Expected one of: xai, anthropic, openai, zai",
                other
            ))),
        }
    }
}

const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Base64-encoded JPEG. Immutable once built.
///
/// Every image is normalized to JPEG before it is sent, so the MIME type is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: String,
}

impl ImagePayload {
    /// Encodes JPEG bytes.
    pub fn jpeg(bytes: &[u8]) -> Self {
        use base64::Engine as _;
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Wraps data that is already base64-encoded JPEG.
    pub fn jpeg_base64(data: String) -> Self {
        Self { data }
    }

    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", JPEG_MIME_TYPE, self.data)
    }
}

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AnalysisResult {
    Fen(FenString),
    /// The provider answered but no FEN shape was found in its reply.
    Unrecognized(String),
    Failed(String),
}

impl AnalysisResult {
    /// Classifies provider output (or a displayed result) by the `ERROR:` convention and FEN shape.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();

        if let Some(message) = text.strip_prefix(ERROR_PREFIX) {
            return AnalysisResult::Failed(message.trim().to_string());
        }

        match FenString::parse(text) {
            Some(fen) => AnalysisResult::Fen(fen),
            None => AnalysisResult::Unrecognized(text.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Fen(_))
    }

    pub fn fen(&self) -> Option<&FenString> {
        match self {
            AnalysisResult::Fen(fen) => Some(fen),
            _ => None,
        }
    }
}

impl From<Error> for AnalysisResult {
    fn from(err: Error) -> Self {
        AnalysisResult::Failed(err.to_string())
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisResult::Fen(fen) => write!(f, "{}", fen),
            AnalysisResult::Unrecognized(text) => {
                write!(f, "{} No FEN found in response: {}", ERROR_PREFIX, text)
            }
            AnalysisResult::Failed(message) => write!(f, "{} {}", ERROR_PREFIX, message),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_image_dimension: u32,
    pub xai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub zai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: None,
            base_url: None,
            timeout: None,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            xai_api_key: None,
            anthropic_api_key: None,
            openai_api_key: None,
            zai_api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("VISION_PROVIDER") {
            Some(name) => name.parse()?,
            None => Provider::OpenAi,
        };

        let timeout = var("VISION_TIMEOUT_SECS")
            .map(|v| {
                v.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    Error::Config(format!("VISION_TIMEOUT_SECS must be an integer, got '{}'", v))
                })
            })
            .transpose()?;

        let max_image_dimension = match var("MAX_IMAGE_DIMENSION") {
            Some(v) => v.trim().parse::<u32>().ok().filter(|d| *d > 0).ok_or_else(|| {
                Error::Config(format!(
                    "MAX_IMAGE_DIMENSION must be a positive integer, got '{}'",
                    v
                ))
            })?,
            None => DEFAULT_MAX_IMAGE_DIMENSION,
        };

        Ok(Self {
            provider,
            model: var("VISION_MODEL"),
            base_url: var("VISION_BASE_URL"),
            timeout,
            max_image_dimension,
            xai_api_key: var(Provider::Xai.api_key_var()),
            anthropic_api_key: var(Provider::Anthropic.api_key_var()),
            openai_api_key: var(Provider::OpenAi.api_key_var()),
            zai_api_key: var(Provider::Zai.api_key_var()),
        })
    }

    /// API key for `provider`, or a config error naming the missing variable.
    pub fn api_key(&self, provider: Provider) -> Result<&str> {
        let key = match provider {
            Provider::Xai => &self.xai_api_key,
            Provider::Anthropic => &self.anthropic_api_key,
            Provider::OpenAi => &self.openai_api_key,
            Provider::Zai => &self.zai_api_key,
        };

        key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "{} not set. Add it to your environment or .env file",
                provider.api_key_var()
            ))
        })
    }
}
