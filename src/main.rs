use anyhow::Context as _;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod pipeline;
mod summarize;
mod transcribe;
mod web;

use audio::FfmpegConverter;
use config::Config;
use pipeline::Pipeline;
use summarize::GeminiClient;
use transcribe::GroqClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minutes=info")),
        )
        .init();

    // Both API keys are checked here, before any network call.
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configured: {}s segments, {} byte upload cap, {} concurrent transcriptions",
        config.segment_secs, config.max_upload_bytes, config.max_concurrent_transcriptions
    );

    let http = reqwest::Client::new();
    let converter = Arc::new(FfmpegConverter::new(config.ffmpeg_path.clone()));
    let transcriber = Arc::new(GroqClient::new(
        http.clone(),
        config.groq_api_key.clone(),
        config.transcription_model.clone(),
    ));
    let summarizer = Arc::new(GeminiClient::new(
        http,
        config.gemini_api_key.clone(),
        config.summarization_model.clone(),
    ));

    let pipeline = Arc::new(Pipeline::new(&config, converter, transcriber, summarizer));
    let app = web::router(pipeline, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
