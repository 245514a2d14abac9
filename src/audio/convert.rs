//! Format normalization via an external ffmpeg invocation.
//!
//! Any accepted container is converted to the canonical WAV encoding
//! before segmentation. A failed invocation aborts the whole run; there
//! is no fallback decoder.

use std::path::Path;
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use super::CANONICAL_SAMPLE_RATE;

/// Keep only the end of ffmpeg's stderr; the useful message is last.
const STDERR_TAIL_BYTES: usize = 600;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Conversion tool not found: {0}")]
    ToolMissing(String),
    #[error("Conversion failed ({status}): {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("IO error during conversion: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability interface for producing canonical-format audio, so the
/// concrete tool can be swapped without touching pipeline logic.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Convert `input` into canonical WAV at `output`.
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;
}

pub struct FfmpegConverter {
    ffmpeg_path: String,
}

impl FfmpegConverter {
    pub fn new(ffmpeg_path: String) -> Self {
        Self { ffmpeg_path }
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        info!("Normalizing {:?} to canonical WAV", input);

        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ar", &CANONICAL_SAMPLE_RATE.to_string()])
            .args(["-ac", "1"])
            .args(["-sample_fmt", "s16"])
            .arg(output)
            .output()
            .await;

        let command_output = match result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConvertError::ToolMissing(self.ffmpeg_path.clone()));
            }
            other => other?,
        };

        if !command_output.status.success() {
            let stderr = String::from_utf8_lossy(&command_output.stderr);
            return Err(ConvertError::CommandFailed {
                status: command_output.status,
                stderr: tail(&stderr, STDERR_TAIL_BYTES),
            });
        }

        info!("Normalized {:?} -> {:?}", input, output);
        Ok(())
    }
}

fn tail(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.trim().to_string();
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].trim().to_string()
}
