use crate::error::{AppError, AppResult};

use super::matrix::RatingMatrix;

/// Brute-force cosine k-nearest-neighbor index over rating-matrix rows.
///
/// The matrix is small (users × rated producers), so exact search is
/// affordable and keeps query results reproducible; no approximate
/// index is involved.
#[derive(Debug, Clone)]
pub struct NeighborModel {
    matrix: RatingMatrix,
}

/// One neighbor hit: the matching user and its cosine distance from
/// the query vector (0 = identical direction, 2 = opposite)
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub user_id: i64,
    pub distance: f64,
}

impl NeighborModel {
    /// Fits the index over the matrix rows.
    ///
    /// A matrix with fewer than two rows, or with no non-zero row,
    /// cannot anchor a similarity query (the only possible hit would
    /// be the self-match) and is rejected with `ModelUnavailable`; the
    /// recommendation engine answers such calls from the popularity
    /// fallback instead.
    pub fn fit(matrix: RatingMatrix) -> AppResult<Self> {
        if matrix.user_ids().len() < 2 {
            return Err(AppError::ModelUnavailable(
                "fewer than two distinct raters".to_string(),
            ));
        }
        if matrix.rows().all(|row| row.iter().all(|v| *v == 0.0)) {
            return Err(AppError::ModelUnavailable(
                "rating matrix has no non-zero row".to_string(),
            ));
        }
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    /// Returns the `k` rows closest to `query`, ascending by cosine
    /// distance, ties in row order. When the query vector is itself a
    /// row of the matrix the matching user comes back at distance 0;
    /// callers drop that self-match before aggregating.
    pub fn query(&self, query: &[f64], k: usize) -> Vec<Neighbor> {
        let mut hits: Vec<Neighbor> = self
            .matrix
            .user_ids()
            .iter()
            .enumerate()
            .map(|(i, &user_id)| Neighbor {
                user_id,
                distance: cosine_distance(query, self.matrix.row(i)),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        hits
    }
}

/// Cosine distance `1 - cos(a, b)`.
///
/// A zero vector has no direction; it compares at distance 2 (maximal)
/// to any non-zero vector and at 0 to another zero vector.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 && norm_b == 0.0 {
        0.0
    } else if norm_a == 0.0 || norm_b == 0.0 {
        2.0
    } else {
        1.0 - dot / (norm_a * norm_b)
    }
}
