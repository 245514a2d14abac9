//! Per-segment speech-to-text and fragment aggregation.
//!
//! Segments are independent, so transcription fans out with a bounded
//! concurrency cap. Fragments always come back in segment-index order,
//! never completion order. A single failed segment becomes a marked gap;
//! the run only aborts when no segment succeeds at all.

mod groq;
mod transcript;

pub use groq::GroqClient;
pub use transcript::{join_fragments, TranscriptFragment};

use crate::audio::Segment;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Transcription request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Transcription service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("IO error reading segment: {0}")]
    Io(#[from] std::io::Error),
    #[error("No segment could be transcribed")]
    AllSegmentsFailed,
    #[error("Transcription task was cancelled")]
    Cancelled,
}

/// One call per segment; the service sees each segment in isolation and
/// performs no cross-segment context stitching.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        filename_hint: &str,
        wav_bytes: Vec<u8>,
    ) -> Result<String, TranscribeError>;
}

/// Transcribe all segments with at most `max_concurrency` calls in flight.
pub async fn transcribe_segments(
    transcriber: Arc<dyn Transcriber>,
    segments: &[Segment],
    max_concurrency: usize,
) -> Result<Vec<TranscriptFragment>, TranscribeError> {
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut handles = Vec::with_capacity(segments.len());

    for segment in segments {
        debug!(
            "Dispatching segment {} ({:.0}s starting at {:.0}s)",
            segment.index, segment.duration_secs, segment.start_secs
        );
        let transcriber = Arc::clone(&transcriber);
        let semaphore = Arc::clone(&semaphore);
        let path = segment.path.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| TranscribeError::Cancelled)?;
            let bytes = tokio::fs::read(&path).await?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("segment.wav")
                .to_string();
            transcriber.transcribe(&filename, bytes).await
        }));
    }

    // Awaiting handles in spawn order keeps fragments in segment order
    // regardless of which call finishes first.
    let mut fragments = Vec::with_capacity(handles.len());
    let mut gap_count = 0usize;
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await.map_err(|_| TranscribeError::Cancelled)? {
            Ok(text) => fragments.push(TranscriptFragment::recognized(index, text)),
            Err(e) => {
                warn!("Segment {} failed, marking a gap: {}", index, e);
                gap_count += 1;
                fragments.push(TranscriptFragment::gap(index));
            }
        }
    }

    if !fragments.is_empty() && gap_count == fragments.len() {
        return Err(TranscribeError::AllSegmentsFailed);
    }

    info!(
        "Transcribed {} segments ({} gaps)",
        fragments.len(),
        gap_count
    );
    Ok(fragments)
}
