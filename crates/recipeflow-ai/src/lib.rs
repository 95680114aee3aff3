//! RecipeFlow AI - streaming LLM client for recipe generation
//!
//! This crate provides:
//! - Chat completion request/response types
//! - A streaming LLM client trait with an OpenAI implementation
//! - Recipe prompt construction from user-supplied parameters

pub mod error;
pub mod llm;
pub mod prompt;

// Re-export commonly used types
pub use error::{AiError, Result};
pub use llm::{
    CompletionRequest, FinishReason, LlmClient, Message, OpenAIClient, Role, StreamChunk,
    StreamResult,
};
pub use prompt::RecipeParams;

#[cfg(feature = "test-utils")]
pub use llm::{MockLlmClient, MockStep, MockStepKind};
