//! LLM client trait and types

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Reason the upstream provider stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Error,
}

/// One incremental unit of a streamed completion.
///
/// A chunk carries at most one of three things: a role marker announcing that
/// generation started (role present, no content), a text fragment (possibly
/// empty), or a finish reason. Empty fragments are preserved; consumers decide
/// whether they matter.
#[derive(Debug, Clone, Default)]
pub struct StreamChunk {
    pub role: Option<Role>,
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// A chunk announcing that the assistant started generating
    pub fn role_marker(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    /// A chunk carrying a text fragment
    pub fn text(fragment: impl Into<String>) -> Self {
        Self {
            text: Some(fragment.into()),
            ..Self::default()
        }
    }

    /// A terminal chunk carrying the finish reason
    pub fn finished(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            ..Self::default()
        }
    }
}

/// Boxed stream of completion chunks
pub type StreamResult = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// LLM completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// LLM client trait
pub trait LlmClient: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// Get model name
    fn model(&self) -> &str;

    /// Open a streaming completion for the request
    fn complete_stream(&self, request: CompletionRequest) -> StreamResult;
}
