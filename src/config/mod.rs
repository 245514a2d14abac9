//! Process configuration, loaded once at startup from the environment.
//!
//! Both API keys are required before any network call is attempted; a
//! missing key is a startup error, not a downstream authentication failure.

use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Default segment length: two minutes of audio per transcription call.
pub const DEFAULT_SEGMENT_SECS: u32 = 120;
/// Default upload cap: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
/// Default cap on parallel transcription calls.
pub const DEFAULT_MAX_CONCURRENT_TRANSCRIPTIONS: usize = 4;

const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";
const DEFAULT_SUMMARIZATION_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the transcription service.
    pub groq_api_key: String,
    /// Credential for the summarization service.
    pub gemini_api_key: String,
    pub transcription_model: String,
    pub summarization_model: String,
    /// Maximum segment duration in seconds.
    pub segment_secs: u32,
    pub max_upload_bytes: usize,
    pub max_concurrent_transcriptions: usize,
    pub bind_addr: SocketAddr,
    pub ffmpeg_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            groq_api_key: require(&get, "GROQ_API_KEY")?,
            gemini_api_key: require(&get, "GEMINI_API_KEY")?,
            transcription_model: string_or(&get, "TRANSCRIPTION_MODEL", DEFAULT_TRANSCRIPTION_MODEL),
            summarization_model: string_or(&get, "SUMMARIZATION_MODEL", DEFAULT_SUMMARIZATION_MODEL),
            segment_secs: parse_or(&get, "SEGMENT_SECS", DEFAULT_SEGMENT_SECS)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_concurrent_transcriptions: parse_or(
                &get,
                "MAX_CONCURRENT_TRANSCRIPTIONS",
                DEFAULT_MAX_CONCURRENT_TRANSCRIPTIONS,
            )?,
            bind_addr: parse_or(&get, "BIND_ADDR", default_bind_addr())?,
            ffmpeg_path: string_or(&get, "FFMPEG_PATH", DEFAULT_FFMPEG_PATH),
        };

        if config.segment_secs == 0 {
            return Err(ConfigError::InvalidVar {
                var: "SEGMENT_SECS",
                value: "0".to_string(),
            });
        }
        if config.max_concurrent_transcriptions == 0 {
            return Err(ConfigError::InvalidVar {
                var: "MAX_CONCURRENT_TRANSCRIPTIONS",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match get(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn string_or(get: &impl Fn(&str) -> Option<String>, var: &str, default: &str) -> String {
    get(var).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar { var, value: raw }),
    }
}
