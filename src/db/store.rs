use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{InventoryEntry, Producer, Product, Rating, User};

/// A rating as submitted by a user, before the store stamps it
#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    pub user_id: i64,
    pub producer_id: i64,
    pub score: i32,
    pub comment: Option<String>,
}

/// Storage collaborator consumed by the filters and the engine.
///
/// The core never mutates producers, products, or inventory; ratings
/// are the only append path. Implementations return full snapshots so
/// one build+query cycle sees consistent data.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_producers(&self) -> AppResult<Vec<Producer>>;
    async fn list_products(&self) -> AppResult<Vec<Product>>;
    async fn list_inventory(&self) -> AppResult<Vec<InventoryEntry>>;
    /// Ratings in append order (oldest first)
    async fn list_ratings(&self) -> AppResult<Vec<Rating>>;
    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>>;
    async fn add_rating(&self, rating: NewRating) -> AppResult<Rating>;
}
