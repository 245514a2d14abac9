//! Groq-hosted Whisper transcription client.
//!
//! One multipart POST per segment against the OpenAI-compatible
//! `audio/transcriptions` endpoint. No retries; a failed call surfaces to
//! the caller, which decides whether to mark a gap.

use super::{TranscribeError, Transcriber};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

const TRANSCRIPTIONS_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
/// Error bodies can be long HTML pages; keep a readable slice.
const MAX_ERROR_BODY_BYTES: usize = 500;

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqClient {
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
            endpoint: TRANSCRIPTIONS_URL.to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for GroqClient {
    async fn transcribe(
        &self,
        filename_hint: &str,
        wav_bytes: Vec<u8>,
    ) -> Result<String, TranscribeError> {
        debug!(
            "Transcribing {} ({} bytes) with model {}",
            filename_hint,
            wav_bytes.len(),
            self.model
        );

        let file_part = Part::bytes(wav_bytes)
            .file_name(filename_hint.to_string())
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_BYTES),
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

fn truncate(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.trim().to_string();
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].trim().to_string()
}
