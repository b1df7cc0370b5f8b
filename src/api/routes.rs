use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Producer listing and filters
        .route("/producers", get(handlers::get_producers))
        .route("/producers/nearby", get(handlers::get_nearby_producers))
        .route(
            "/producers/search",
            post(handlers::search_producers_by_products),
        )
        .route(
            "/producers/in-season",
            get(handlers::get_producers_in_season),
        )
        // Collaborative recommendations
        .route(
            "/recommendations/:user_id",
            get(handlers::get_recommendations),
        )
        // Ratings
        .route("/ratings", post(handlers::create_rating))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
