//! RecipeFlow server - recipe SSE relay plus embedded SPA assets

pub mod api;
pub mod config;
pub mod static_assets;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::cors::CorsLayer;

use api::state::AppState;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "recipeflow is working!".to_string(),
    })
}

/// Build the application router: the streaming endpoint, a health probe, and
/// the static asset fallback, with permissive CORS for all routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/recipeStream", get(api::recipe::stream_recipe))
        .fallback(static_assets::static_handler)
        .layer(cors)
        .with_state(state)
}
