//! OpenAI LLM provider

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::llm::client::{
    CompletionRequest, FinishReason, LlmClient, Role, StreamChunk, StreamResult,
};

const DISABLE_SYSTEM_PROXY_ENV: &str = "RECIPEFLOW_DISABLE_SYSTEM_PROXY";

// Tests talk to a local mock server; going through a system proxy there
// breaks them, so the proxy can be switched off.
fn build_http_client() -> Client {
    let disable_proxy =
        std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() || cfg!(test);
    if disable_proxy {
        Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build reqwest client")
    } else {
        Client::new()
    }
}

/// OpenAI client
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(),
            api_key: api_key.into(),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set custom base URL (for API-compatible services)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: Role,
    content: String,
}

// Streaming types

#[derive(Deserialize, Debug)]
struct OpenAIStreamResponse {
    choices: Vec<OpenAIStreamChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAIStreamChoice {
    delta: OpenAIStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct OpenAIStreamDelta {
    role: Option<Role>,
    content: Option<String>,
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        _ => FinishReason::Error,
    }
}

fn chunks_for_event(parsed: OpenAIStreamResponse) -> Vec<StreamChunk> {
    parsed
        .choices
        .into_iter()
        .map(|choice| {
            if let Some(reason) = choice.finish_reason.as_deref() {
                StreamChunk::finished(map_finish_reason(reason))
            } else {
                // Empty fragments are forwarded as-is; the relay contract
                // leaves it to the consumer to decide whether they matter.
                StreamChunk {
                    role: choice.delta.role,
                    text: choice.delta.content,
                    finish_reason: None,
                }
            }
        })
        .collect()
}

/// Incremental decoder for the upstream SSE byte stream.
///
/// Network reads are buffered as bytes and only decoded once a blank line
/// completes an event, so a multi-byte UTF-8 character split across two
/// reads survives intact. Generated recipe names are routinely non-ASCII,
/// which makes decoding each read independently unsafe.
#[derive(Default)]
struct SseFrameBuffer {
    buf: Vec<u8>,
}

impl SseFrameBuffer {
    /// Feed one network read; returns the chunks of every event it completed.
    fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.buf.extend_from_slice(bytes);

        let mut chunks = Vec::new();
        while let Some(pos) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buf.drain(..pos + 2).collect();
            let event_str = String::from_utf8_lossy(&event[..pos]);
            Self::parse_event(&event_str, &mut chunks);
        }
        chunks
    }

    /// Drain a final event that lacks its trailing blank line (e.g., due to
    /// a network interruption).
    fn finish(self) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        let remaining = String::from_utf8_lossy(&self.buf);
        if !remaining.trim().is_empty() {
            Self::parse_event(remaining.trim(), &mut chunks);
        }
        chunks
    }

    fn parse_event(event_str: &str, chunks: &mut Vec<StreamChunk>) {
        for line in event_str.lines() {
            if let Some(data) = line.strip_prefix("data: ") {
                if data.trim() == "[DONE]" || data.trim().is_empty() {
                    continue;
                }
                if let Ok(parsed) = serde_json::from_str::<OpenAIStreamResponse>(data) {
                    chunks.append(&mut chunks_for_event(parsed));
                }
            }
        }
    }
}

impl LlmClient for OpenAIClient {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete_stream(&self, request: CompletionRequest) -> StreamResult {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let base_url = self.base_url.clone();
        let model = self.model.clone();

        Box::pin(async_stream::stream! {
            let messages: Vec<OpenAIMessage> = request
                .messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect();

            let body = OpenAIRequest {
                model,
                messages,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                stream: true,
            };

            tracing::debug!(model = %body.model, "Opening streaming completion request");

            let response = match client
                .post(format!("{}/chat/completions", base_url))
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(AiError::Llm(format!("Request failed: {}", e)));
                    return;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                yield Err(AiError::Llm(format!(
                    "OpenAI API error ({}): {}",
                    status, detail
                )));
                return;
            }

            let mut byte_stream = response.bytes_stream();
            let mut frames = SseFrameBuffer::default();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(AiError::Llm(format!("Stream error: {}", e)));
                        return;
                    }
                };

                for stream_chunk in frames.push(&bytes) {
                    yield Ok(stream_chunk);
                }
            }

            for stream_chunk in frames.finish() {
                yield Ok(stream_chunk);
            }
        })
    }
}
