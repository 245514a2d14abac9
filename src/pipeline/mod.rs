//! The linear run: acquire, normalize, segment, transcribe, aggregate,
//! summarize.
//!
//! Every artifact of a run lives under one scoped temporary directory
//! that is removed when the run finishes, on every exit path. There is
//! no state shared between runs.

use crate::audio::{
    self, AudioConverter, ConvertError, SegmentError, Segmenter, CANONICAL_EXTENSION,
};
use crate::config::Config;
use crate::summarize::Summarizer;
use crate::transcribe::{self, join_fragments, TranscribeError, Transcriber};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Extensions accepted at upload. Everything except `wav` goes through
/// the normalizer first.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "flac"];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Uploaded file is empty")]
    EmptyUpload,
    #[error("Uploaded file has no extension")]
    MissingExtension,
    #[error("Unsupported file type .{0} (accepted: mp3, wav, m4a, ogg, flac)")]
    UnsupportedFormat(String),
    #[error("Uploaded file is too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
}

/// Result of one run. The transcript is kept even when summarization
/// fails; the error message rides alongside instead of replacing it.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub run_id: String,
    pub transcript: String,
    pub summary: Option<String>,
    pub summary_error: Option<String>,
    /// Indexes of segments that produced a gap instead of text.
    pub gap_segments: Vec<usize>,
    pub segment_count: usize,
}

pub struct Pipeline {
    segmenter: Segmenter,
    max_upload_bytes: usize,
    max_concurrent_transcriptions: usize,
    converter: Arc<dyn AudioConverter>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        converter: Arc<dyn AudioConverter>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            segmenter: Segmenter::new(config.segment_secs),
            max_upload_bytes: config.max_upload_bytes,
            max_concurrent_transcriptions: config.max_concurrent_transcriptions,
            converter,
            transcriber,
            summarizer,
        }
    }

    pub async fn run(&self, filename: &str, bytes: &[u8]) -> Result<RunOutput, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyUpload);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(PipelineError::TooLarge {
                size: bytes.len(),
                limit: self.max_upload_bytes,
            });
        }
        let extension = audio::file_extension(filename).ok_or(PipelineError::MissingExtension)?;
        if !ACCEPTED_EXTENSIONS.contains(&extension) {
            return Err(PipelineError::UnsupportedFormat(extension.to_string()));
        }

        let run_id = format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S%3f"));
        info!(
            "[{}] Starting run for {} ({} bytes)",
            run_id,
            filename,
            bytes.len()
        );

        // Scoped working directory; deleted on drop, errors included.
        let workdir = tempfile::tempdir()?;
        let upload_path = workdir.path().join(format!("upload.{extension}"));
        tokio::fs::write(&upload_path, bytes).await?;

        // Already-canonical input skips the converter entirely.
        let canonical_path = if extension == CANONICAL_EXTENSION {
            upload_path
        } else {
            let converted = workdir.path().join("normalized.wav");
            self.converter.convert_to_wav(&upload_path, &converted).await?;
            converted
        };

        let segment_dir = workdir.path().join("segments");
        let segments = self.segmenter.split_wav(&canonical_path, &segment_dir)?;

        let fragments = transcribe::transcribe_segments(
            Arc::clone(&self.transcriber),
            &segments,
            self.max_concurrent_transcriptions,
        )
        .await?;
        let gap_segments: Vec<usize> = fragments
            .iter()
            .filter(|fragment| fragment.is_gap())
            .map(|fragment| fragment.index)
            .collect();
        let transcript = join_fragments(&fragments);

        let (summary, summary_error) = match self.summarizer.summarize(&transcript).await {
            Ok(summary) => (Some(summary), None),
            Err(e) => {
                warn!("[{}] Summarization failed, keeping transcript: {}", run_id, e);
                (None, Some(e.to_string()))
            }
        };

        info!(
            "[{}] Run complete: {} segments, {} gaps, summary: {}",
            run_id,
            segments.len(),
            gap_segments.len(),
            if summary.is_some() { "ok" } else { "failed" }
        );

        Ok(RunOutput {
            run_id,
            transcript,
            summary,
            summary_error,
            gap_segments,
            segment_count: segments.len(),
        })
    }
}
