use crate::config::SttConfig;
use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

/// Bounds the whole transcription round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Client for an OpenAI-compatible speech-to-text endpoint
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    client: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build transcription HTTP client")?;

        Ok(Self { client })
    }

    /// Transcribe an audio payload.
    ///
    /// Sends the bytes as the `file` part (fixed `audio.wav` filename and
    /// `audio/wav` content type, per the endpoint contract) together with
    /// the configured model name. The bearer header is attached only when
    /// a credential is configured.
    pub async fn transcribe(&self, audio: Vec<u8>, cfg: &SttConfig) -> Result<String> {
        let url = format!("{}{}", cfg.endpoint.trim_end_matches('/'), TRANSCRIPTIONS_PATH);

        info!("Transcribing {} bytes via {}", audio.len(), url);

        let file_part = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .context("Failed to build audio form part")?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", cfg.model.clone());

        let mut request = self.client.post(&url).multipart(form);
        if !cfg.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", cfg.api_key));
        }

        let response = request.send().await.context("ASR request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("ASR error ({}): {}", status.as_u16(), body);
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse ASR response")?;

        info!("Transcription returned {} chars", parsed.text.len());
        Ok(parsed.text)
    }
}
