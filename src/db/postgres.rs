use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::{InventoryEntry, Producer, Product, Rating, Season, User};

use super::store::{NewRating, Store};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed `Store`
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProducerRow {
    id: i64,
    name: String,
    code: String,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<ProducerRow> for Producer {
    fn from(row: ProducerRow) -> Self {
        Producer {
            id: row.id,
            name: row.name,
            code: row.code,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    seasonality: String,
    description: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let seasonality: Season = row
            .seasonality
            .parse()
            .map_err(AppError::Internal)?;
        Ok(Product {
            id: row.id,
            name: row.name,
            seasonality,
            description: row.description,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RatingRow {
    user_id: i64,
    producer_id: i64,
    score: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            user_id: row.user_id,
            producer_id: row.producer_id,
            score: row.score,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_producers(&self) -> AppResult<Vec<Producer>> {
        let rows: Vec<ProducerRow> = sqlx::query_as(
            "SELECT id, name, code, address, latitude, longitude FROM producers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Producer::from).collect())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT id, name, seasonality, description FROM products ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn list_inventory(&self) -> AppResult<Vec<InventoryEntry>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT producer_id, product_id FROM producer_inventory ORDER BY producer_id, product_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(producer_id, product_id)| InventoryEntry {
                producer_id,
                product_id,
            })
            .collect())
    }

    async fn list_ratings(&self) -> AppResult<Vec<Rating>> {
        // Append order; the matrix builder relies on it to break
        // timestamp ties
        let rows: Vec<RatingRow> = sqlx::query_as(
            "SELECT user_id, producer_id, score, comment, created_at FROM ratings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Rating::from).collect())
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, username FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, username)| User { id, username }))
    }

    async fn add_rating(&self, rating: NewRating) -> AppResult<Rating> {
        let row: RatingRow = sqlx::query_as(
            "INSERT INTO ratings (user_id, producer_id, score, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING user_id, producer_id, score, comment, created_at",
        )
        .bind(rating.user_id)
        .bind(rating.producer_id)
        .bind(rating.score)
        .bind(rating.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
