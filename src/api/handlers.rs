use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::db::NewRating;
use crate::error::{AppError, AppResult};
use crate::models::{
    NearbyProducer, Producer, RankedProducer, Rating, Season, MAX_SCORE, MIN_SCORE,
};
use crate::services::{geo, preference, recommend, seasonality, RecommendParams};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

#[derive(Debug, Deserialize)]
pub struct ProductSearchRequest {
    pub products: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<Season>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub top_n: Option<usize>,
    pub min_score: Option<i32>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All registered producers
pub async fn get_producers(State(state): State<AppState>) -> AppResult<Json<Vec<Producer>>> {
    Ok(Json(state.store.list_producers().await?))
}

/// Producers within a radius of the caller, closest first
pub async fn get_nearby_producers(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyProducer>>> {
    let producers = state.store.list_producers().await?;
    let nearby = geo::filter_by_distance(query.lat, query.lon, query.radius_km, &producers);
    tracing::debug!(
        radius_km = query.radius_km,
        matched = nearby.len(),
        "distance filter applied"
    );
    Ok(Json(nearby))
}

/// Producers stocking every product named in the request body
pub async fn search_producers_by_products(
    State(state): State<AppState>,
    Json(request): Json<ProductSearchRequest>,
) -> AppResult<Json<Vec<Producer>>> {
    let products = state.store.list_products().await?;
    let inventory = state.store.list_inventory().await?;
    let producers = state.store.list_producers().await?;
    let matched =
        preference::filter_by_products(&request.products, &products, &inventory, &producers)?;
    Ok(Json(matched))
}

/// Producers with at least one product in season; defaults to the
/// season of the current month
pub async fn get_producers_in_season(
    State(state): State<AppState>,
    Query(query): Query<SeasonQuery>,
) -> AppResult<Json<Vec<Producer>>> {
    let products = state.store.list_products().await?;
    let inventory = state.store.list_inventory().await?;
    let producers = state.store.list_producers().await?;
    let matched = seasonality::filter_by_season(query.season, &products, &inventory, &producers);
    Ok(Json(matched))
}

/// Personalized producer recommendations for one user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<Vec<RankedProducer>>> {
    // "Never rated anything" is a valid cold start; a user id missing
    // from the user store is not
    if state.store.get_user(user_id).await?.is_none() {
        return Err(AppError::UnknownEntity(format!("user {user_id} not found")));
    }

    let params = RecommendParams {
        neighbor_k: state.config.neighbor_k,
        top_n: query.top_n.unwrap_or(state.config.default_top_n),
        min_score: query.min_score.unwrap_or(state.config.default_min_score),
    };

    let snapshot = state.model_snapshot().await?;
    let producers = state.store.list_producers().await?;
    let ranked = recommend(user_id, &producers, &snapshot, params);

    tracing::info!(
        user_id,
        top_n = params.top_n,
        min_score = params.min_score,
        returned = ranked.len(),
        "recommendation served"
    );
    Ok(Json(ranked))
}

/// Appends a rating and invalidates the cached neighbor model
pub async fn create_rating(
    State(state): State<AppState>,
    Json(request): Json<NewRating>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&request.score) {
        return Err(AppError::InvalidInput(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    if state.store.get_user(request.user_id).await?.is_none() {
        return Err(AppError::UnknownEntity(format!(
            "user {} not found",
            request.user_id
        )));
    }
    let producers = state.store.list_producers().await?;
    if !producers.iter().any(|p| p.id == request.producer_id) {
        return Err(AppError::UnknownEntity(format!(
            "producer {} not found",
            request.producer_id
        )));
    }

    let rating = state.store.add_rating(request).await?;
    // Any rating change stales the matrix and the model
    state.invalidate_model().await;

    Ok((StatusCode::CREATED, Json(rating)))
}
