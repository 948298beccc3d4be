use super::sse::{parse_line, SseEvent};
use crate::config::LlmConfig;
use anyhow::{Context, Result};
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Bounds the whole completion round trip, including streaming
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Request-body keys extra_api_params may not override
const RESERVED_KEYS: &[&str] = &["model", "messages", "stream"];

/// Aggregated result of one streamed completion.
///
/// A mid-stream failure keeps the fragments collected so far: a partially
/// generated note is worth showing alongside the error, not discarding.
#[derive(Debug, Default)]
pub struct StreamResult {
    /// Content fragments in network arrival order
    pub fragments: Vec<String>,

    /// Error encountered before or during the stream, if any
    pub error: Option<String>,
}

impl StreamResult {
    /// The full message: all fragments concatenated in arrival order
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn failed(message: String) -> Self {
        Self {
            fragments: Vec::new(),
            error: Some(message),
        }
    }
}

/// Client for an OpenAI-compatible streaming completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build completion HTTP client")?;

        Ok(Self { client })
    }

    /// Stream a completion for `prompt` and aggregate the delta fragments.
    ///
    /// Errors never propagate as `Err`: they land in `StreamResult::error`
    /// so the caller always receives whatever text made it through.
    pub async fn stream_complete(&self, prompt: &str, cfg: &LlmConfig) -> StreamResult {
        let url = format!("{}{}", cfg.endpoint.trim_end_matches('/'), COMPLETIONS_PATH);
        let body = build_request_body(prompt, cfg);

        let mut request = self.client.post(&url).json(&body);
        if !cfg.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", cfg.api_key));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return StreamResult::failed(format!("LLM request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StreamResult::failed(format!("LLM error ({}): {}", status.as_u16(), body));
        }

        let mut result = StreamResult::default();
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut done = false;

        // Network chunks split lines arbitrarily; buffer until a newline
        // completes an event line before handing it to the parser.
        'read: while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Completion stream interrupted: {}", e);
                    result.error = Some(format!("Completion stream interrupted: {}", e));
                    return result;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                match parse_line(&String::from_utf8_lossy(&line)) {
                    SseEvent::Content(content) => result.fragments.push(content),
                    SseEvent::Done => {
                        done = true;
                        break 'read;
                    }
                    SseEvent::Ignored => {}
                }
            }
        }

        // A trailing event without a final newline still counts
        if !done && !buffer.is_empty() {
            if let SseEvent::Content(content) = parse_line(&String::from_utf8_lossy(&buffer)) {
                result.fragments.push(content);
            }
        }

        debug!(
            "Completion stream finished: {} fragments, {} chars",
            result.fragments.len(),
            result.fragments.iter().map(String::len).sum::<usize>()
        );

        result
    }
}

fn build_request_body(prompt: &str, cfg: &LlmConfig) -> Value {
    let mut body = json!({
        "model": cfg.model,
        "messages": [
            {"role": "system", "content": cfg.system_prompt},
            {"role": "user", "content": prompt}
        ],
        "max_tokens": cfg.max_tokens,
        "temperature": cfg.temperature,
        "top_k": cfg.top_k,
        "top_p": cfg.top_p,
        "min_p": cfg.min_p,
        "stream": true
    });

    if let Value::Object(map) = &mut body {
        for (key, value) in &cfg.extra_api_params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            map.insert(key.clone(), value.clone());
        }
    }

    body
}
