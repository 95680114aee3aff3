#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use recipeflow_ai::OpenAIClient;
use recipeflow_server::api::state::AppState;
use recipeflow_server::config::ServerConfig;
use recipeflow_server::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipeflow_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting RecipeFlow backend server");

    let config = ServerConfig::load()?;
    if config.openai_api_key.is_empty() {
        // Not fatal: the upstream call fails at the point of use instead
        tracing::warn!("OPENAI_API_KEY is not set; recipe streams will fail upstream");
    }

    let llm = OpenAIClient::new(config.openai_api_key.clone())
        .with_model(config.openai_model.clone())
        .with_base_url(config.openai_base_url.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let app = router(AppState::new(config, Arc::new(llm)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("RecipeFlow running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
