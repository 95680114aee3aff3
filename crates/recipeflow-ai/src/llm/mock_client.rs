//! Deterministic mock LLM client for relay and server tests.

use async_stream::stream;
use tokio::time::{Duration, sleep};

use crate::error::AiError;

use super::{CompletionRequest, FinishReason, LlmClient, Role, StreamChunk, StreamResult};

/// Scripted step replayed by [`MockLlmClient`], with optional delay.
#[derive(Debug, Clone)]
pub struct MockStep {
    pub delay_ms: u64,
    pub kind: MockStepKind,
}

/// Deterministic step for scripted mock streams.
#[derive(Debug, Clone)]
pub enum MockStepKind {
    /// Yield a chunk announcing that the assistant started generating.
    RoleMarker,
    /// Yield a text fragment.
    Text(String),
    /// Yield a terminal chunk with the given finish reason.
    Finish(FinishReason),
    /// Yield a stream error.
    Error(String),
}

impl MockStep {
    pub fn role_marker() -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::RoleMarker,
        }
    }

    pub fn text(fragment: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Text(fragment.into()),
        }
    }

    pub fn finish(reason: FinishReason) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Finish(reason),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Error(message.into()),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Mock client that replays a fixed script, ignoring the request.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    steps: Vec<MockStep>,
}

impl MockLlmClient {
    pub fn new(steps: Vec<MockStep>) -> Self {
        Self { steps }
    }

    /// A typical successful generation: role marker, fragments, stop.
    pub fn scripted_text(fragments: &[&str]) -> Self {
        let mut steps = vec![MockStep::role_marker()];
        steps.extend(fragments.iter().map(|f| MockStep::text(*f)));
        steps.push(MockStep::finish(FinishReason::Stop));
        Self::new(steps)
    }
}

impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn complete_stream(&self, _request: CompletionRequest) -> StreamResult {
        let steps = self.steps.clone();

        Box::pin(stream! {
            for step in steps {
                if step.delay_ms > 0 {
                    sleep(Duration::from_millis(step.delay_ms)).await;
                }
                match step.kind {
                    MockStepKind::RoleMarker => {
                        yield Ok(StreamChunk::role_marker(Role::Assistant))
                    }
                    MockStepKind::Text(fragment) => yield Ok(StreamChunk::text(fragment)),
                    MockStepKind::Finish(reason) => yield Ok(StreamChunk::finished(reason)),
                    MockStepKind::Error(message) => yield Err(AiError::Llm(message)),
                }
            }
        })
    }
}
