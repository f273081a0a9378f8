use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::error::{RecapError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral";

/// One record of the backend's newline-delimited response stream. Only the
/// text fragment matters; completion flags and token counts are ignored.
#[derive(Debug, Deserialize)]
struct GenerateRecord {
    #[serde(default)]
    response: Option<String>,
}

/// Seam for the text-generation backend so pipeline stages can be tested
/// against a mock instead of a live server.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for a local Ollama-compatible `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generate for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecapError::BackendError {
                status: status.as_u16(),
            });
        }

        // Records arrive newline-delimited but may be split across reads, so
        // buffer bytes and cut on '\n'.
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut text = String::new();

        while let Some(piece) = stream.next().await {
            buffer.extend_from_slice(&piece?);
            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                append_fragment(&mut text, &line[..pos]);
            }
        }
        append_fragment(&mut text, &buffer);

        Ok(text.trim().to_string())
    }
}

/// Parse one stream record and append its text fragment, if any. Blank or
/// malformed lines are skipped.
fn append_fragment(out: &mut String, line: &[u8]) {
    if line.is_empty() {
        return;
    }
    if let Ok(record) = serde_json::from_slice::<GenerateRecord>(line) {
        if let Some(fragment) = record.response {
            out.push_str(&fragment);
        }
    }
}
