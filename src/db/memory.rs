use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{InventoryEntry, Producer, Product, Rating, Season, User};

use super::store::{NewRating, Store};

/// In-memory `Store`, used by tests and by local runs without a
/// database (`USE_MEMORY_STORE=true`)
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    producers: Vec<Producer>,
    products: Vec<Product>,
    inventory: Vec<InventoryEntry>,
    ratings: Vec<Rating>,
    users: Vec<User>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_producer(
        mut self,
        id: i64,
        name: &str,
        code: &str,
        coordinates: Option<(f64, f64)>,
    ) -> Self {
        self.inner.get_mut().producers.push(Producer {
            id,
            name: name.to_string(),
            code: code.to_string(),
            address: None,
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lon)| lon),
        });
        self
    }

    pub fn with_product(mut self, id: i64, name: &str, seasonality: Season) -> Self {
        self.inner.get_mut().products.push(Product {
            id,
            name: name.to_string(),
            seasonality,
            description: None,
        });
        self
    }

    pub fn with_inventory(mut self, producer_id: i64, product_id: i64) -> Self {
        let inventory = &mut self.inner.get_mut().inventory;
        let entry = InventoryEntry {
            producer_id,
            product_id,
        };
        // (producer, product) pairs are unique
        if !inventory.contains(&entry) {
            inventory.push(entry);
        }
        self
    }

    pub fn with_user(mut self, id: i64, username: &str) -> Self {
        self.inner.get_mut().users.push(User {
            id,
            username: username.to_string(),
        });
        self
    }

    pub fn with_rating(mut self, user_id: i64, producer_id: i64, score: i32) -> Self {
        self.inner.get_mut().ratings.push(Rating {
            user_id,
            producer_id,
            score,
            comment: None,
            created_at: Utc::now(),
        });
        self
    }
}

#[async_trait]
impl Store for MemStore {
    async fn list_producers(&self) -> AppResult<Vec<Producer>> {
        Ok(self.inner.read().await.producers.clone())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn list_inventory(&self) -> AppResult<Vec<InventoryEntry>> {
        Ok(self.inner.read().await.inventory.clone())
    }

    async fn list_ratings(&self) -> AppResult<Vec<Rating>> {
        Ok(self.inner.read().await.ratings.clone())
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn add_rating(&self, rating: NewRating) -> AppResult<Rating> {
        let rating = Rating {
            user_id: rating.user_id,
            producer_id: rating.producer_id,
            score: rating.score,
            comment: rating.comment,
            created_at: Utc::now(),
        };
        self.inner.write().await.ratings.push(rating.clone());
        Ok(rating)
    }
}
