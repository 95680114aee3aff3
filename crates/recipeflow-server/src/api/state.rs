use crate::config::ServerConfig;
use recipeflow_ai::LlmClient;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Carries the startup configuration and the upstream client behind the
/// `LlmClient` trait so tests can swap in a scripted fake.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(config: ServerConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            config: Arc::new(config),
            llm,
        }
    }
}
