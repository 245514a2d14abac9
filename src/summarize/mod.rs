//! Summarization of the aggregated transcript.
//!
//! One call with a fixed instructional prompt; the transcript is
//! interpolated verbatim. An oversized transcript is not pre-split here,
//! so it fails at the service's input limit.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Summarization request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Summarization service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Summarization response contained no text")]
    EmptyResponse,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String, SummarizeError>;
}

/// Fixed template. The three headings are an instruction to the model,
/// not an enforced schema on the response.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "You are a professional meeting assistant.\n\
         Summarize this transcript into:\n\
         - Key Decisions\n\
         - Action Items\n\
         - Discussion Points\n\
         \n\
         Transcript:\n\
         {transcript}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_headings_and_transcript() {
        let prompt = build_prompt("Hello team.\nLet's ship Friday.");

        assert!(prompt.contains("Key Decisions"));
        assert!(prompt.contains("Action Items"));
        assert!(prompt.contains("Discussion Points"));
        // Interpolated verbatim, newlines intact.
        assert!(prompt.ends_with("Transcript:\nHello team.\nLet's ship Friday."));
    }
}
