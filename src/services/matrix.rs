use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::Rating;

/// Dense user × producer table of aggregated scores.
///
/// Rows follow `users`, columns follow `producers`, both sorted
/// ascending by id so rebuilds over the same data are identical. A
/// zero cell means "no rating"; the model cannot distinguish that from
/// a hypothetical neutral score, which is a documented compromise of
/// the rating scale starting at 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingMatrix {
    /// Row-major score table
    values: Vec<Vec<f64>>,
    /// Distinct user ids with at least one rating, ascending
    users: Vec<i64>,
    /// Distinct producer ids with at least one rating, ascending
    producers: Vec<i64>,
}

impl RatingMatrix {
    /// Pivots sparse rating records into the dense matrix.
    ///
    /// The store allows several ratings for the same (user, producer)
    /// pair; the most recent by timestamp wins, and a timestamp tie
    /// goes to the later record in input order (the row appended
    /// last). An empty rating set yields an empty matrix, which
    /// callers treat as a cold-start signal rather than an error.
    pub fn build(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let mut latest: HashMap<(i64, i64), (DateTime<Utc>, i32)> = HashMap::new();
        for r in ratings {
            match latest.entry((r.user_id, r.producer_id)) {
                Entry::Occupied(mut slot) => {
                    if r.created_at >= slot.get().0 {
                        slot.insert((r.created_at, r.score));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((r.created_at, r.score));
                }
            }
        }

        let mut users: Vec<i64> = latest.keys().map(|(u, _)| *u).collect();
        users.sort_unstable();
        users.dedup();

        let mut producers: Vec<i64> = latest.keys().map(|(_, p)| *p).collect();
        producers.sort_unstable();
        producers.dedup();

        let row_of: HashMap<i64, usize> = users.iter().enumerate().map(|(i, u)| (*u, i)).collect();
        let col_of: HashMap<i64, usize> = producers
            .iter()
            .enumerate()
            .map(|(j, p)| (*p, j))
            .collect();

        let mut values = vec![vec![0.0; producers.len()]; users.len()];
        for ((user_id, producer_id), (_, score)) in &latest {
            values[row_of[user_id]][col_of[producer_id]] = f64::from(*score);
        }

        Self {
            values,
            users,
            producers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn user_ids(&self) -> &[i64] {
        &self.users
    }

    pub fn producer_ids(&self) -> &[i64] {
        &self.producers
    }

    /// Row offset for a user id; `None` when the user has no rating.
    /// This is the user↔row bijection the similarity index relies on.
    pub fn row_of(&self, user_id: i64) -> Option<usize> {
        self.users.binary_search(&user_id).ok()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.values[index]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.iter().map(Vec::as_slice)
    }

    /// The aggregated score a user gave a producer, 0.0 when unrated
    pub fn score(&self, user_id: i64, producer_id: i64) -> f64 {
        let Some(row) = self.row_of(user_id) else {
            return 0.0;
        };
        match self.producers.binary_search(&producer_id) {
            Ok(col) => self.values[row][col],
            Err(_) => 0.0,
        }
    }

    /// Mean of the non-zero entries in a producer's column; `None`
    /// when nobody rated the producer
    pub fn mean_rating(&self, producer_id: i64) -> Option<f64> {
        let col = self.producers.binary_search(&producer_id).ok()?;
        let scores: Vec<f64> = self
            .values
            .iter()
            .map(|row| row[col])
            .filter(|v| *v != 0.0)
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
