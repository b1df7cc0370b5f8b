use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive score bounds for a rating
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// One user's rating of one producer.
///
/// The data model allows several ratings for the same (user, producer)
/// pair; the matrix builder aggregates them (latest timestamp wins).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: i64,
    pub producer_id: i64,
    /// Integer score in `[MIN_SCORE, MAX_SCORE]`
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registered consumer; used by the core only as a rating-matrix row
/// key (credentials stay in the auth layer)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
}
