//! Client for OpenAI-compatible `/audio/transcriptions` endpoints.

use anyhow::Context;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SttError {
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("speech was not recognized")]
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Something that turns a WAV clip into text.
pub trait Transcriber {
    fn transcribe(&self, wav: Vec<u8>) -> Result<String, SttError>;
}

/// Blocking transcription client.
pub struct WhisperClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    language: String,
}

impl WhisperClient {
    /// Creates a client for `{base_url}/audio/transcriptions`.
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        language: String,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: transcription_endpoint(base_url),
            api_key,
            model,
            language,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transcriber for WhisperClient {
    fn transcribe(&self, wav: Vec<u8>) -> Result<String, SttError> {
        let file = multipart::Part::bytes(wav)
            .file_name("speech.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "json")
            .part("file", file);

        let response: TranscriptionResponse = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?
            .error_for_status()?
            .json()?;

        debug!(raw = %response.text, "Transcription response");
        recognized_text(&response.text).ok_or(SttError::Unrecognized)
    }
}

fn transcription_endpoint(base_url: &str) -> String {
    format!("{}/audio/transcriptions", base_url.trim_end_matches('/'))
}

/// Strips whitespace and trailing punctuation; `None` when nothing is left.
///
/// Whisper tends to return "Move." or " 10." for short utterances.
fn recognized_text(raw: &str) -> Option<String> {
    let text = raw
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ','))
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
