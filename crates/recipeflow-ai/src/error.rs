//! Error types for the AI crate

use thiserror::Error;

/// AI crate error types
#[derive(Error, Debug)]
pub enum AiError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
