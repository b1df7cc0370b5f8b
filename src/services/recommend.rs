use std::collections::BTreeSet;

use crate::models::{Producer, RankedProducer};

use super::matrix::RatingMatrix;
use super::neighbors::NeighborModel;

/// Tunables for one recommendation call
#[derive(Debug, Clone, Copy)]
pub struct RecommendParams {
    /// Neighbors requested from the index, self-match included
    pub neighbor_k: usize,
    /// Maximum length of the returned list
    pub top_n: usize,
    /// Minimum neighbor score for a producer to count as endorsed
    pub min_score: i32,
}

/// The rating matrix together with the model fit on it, taken as one
/// consistent snapshot. `ColdStart` means the matrix cannot anchor a
/// similarity query (no ratings, or none with signal); the engine then
/// answers from the popularity ranking.
#[derive(Debug, Clone)]
pub enum ModelSnapshot {
    Fitted(NeighborModel),
    ColdStart(RatingMatrix),
}

impl ModelSnapshot {
    pub fn matrix(&self) -> &RatingMatrix {
        match self {
            ModelSnapshot::Fitted(model) => model.matrix(),
            ModelSnapshot::ColdStart(matrix) => matrix,
        }
    }
}

/// Produces a ranked recommendation list for one user.
///
/// Neighbor-endorsed producers (rated at or above `min_score` by a
/// nearest neighbor) are deduplicated, stripped of everything the
/// target already rated, ranked by aggregate rating, and truncated to
/// `top_n`. A user absent from the matrix, or an unfittable matrix,
/// routes to the popularity fallback. Output is deterministic for an
/// unchanged snapshot: ranking ties resolve by producer id.
pub fn recommend(
    target_user: i64,
    producers: &[Producer],
    snapshot: &ModelSnapshot,
    params: RecommendParams,
) -> Vec<RankedProducer> {
    let matrix = snapshot.matrix();

    let (model, target_row) = match (snapshot, matrix.row_of(target_user)) {
        (ModelSnapshot::Fitted(model), Some(row)) => (model, row),
        // Cold start: no model to query, or a user with no rating
        // history to anchor one
        _ => {
            tracing::debug!(target_user, "cold start, using popularity fallback");
            return rank_by_popularity(target_user, producers, matrix, params.top_n);
        }
    };

    let query_vec: Vec<f64> = matrix.row(target_row).to_vec();
    let neighbors = model.query(&query_vec, params.neighbor_k);

    // BTreeSet keeps candidate ids deduplicated and in ascending
    // order, the documented tie-break for equal aggregate ratings
    let mut candidates: BTreeSet<i64> = BTreeSet::new();
    let min_score = f64::from(params.min_score);
    for neighbor in neighbors
        .iter()
        .filter(|n| n.user_id != target_user)
    {
        let Some(row) = matrix.row_of(neighbor.user_id) else {
            continue;
        };
        for (col, value) in matrix.row(row).iter().enumerate() {
            if *value >= min_score {
                candidates.insert(matrix.producer_ids()[col]);
            }
        }
    }

    // Never re-recommend something the target already evaluated,
    // regardless of the score given
    candidates.retain(|producer_id| matrix.score(target_user, *producer_id) == 0.0);

    let mut ranked: Vec<RankedProducer> = candidates
        .iter()
        .filter_map(|producer_id| annotate(producers, matrix, *producer_id))
        .collect();
    ranked.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
    ranked.truncate(params.top_n);

    tracing::debug!(
        target_user,
        neighbors = neighbors.len(),
        returned = ranked.len(),
        "neighbor recommendation complete"
    );
    ranked
}

/// Global fallback: producers ranked by the mean of all ratings
/// received, descending, ties by producer id. Producers nobody rated
/// are not listed, and the no-re-recommendation rule applies here
/// too, so the target's own history never comes back. Zero ratings
/// overall yields an empty list.
fn rank_by_popularity(
    target_user: i64,
    producers: &[Producer],
    matrix: &RatingMatrix,
    top_n: usize,
) -> Vec<RankedProducer> {
    let mut ranked: Vec<RankedProducer> = matrix
        .producer_ids()
        .iter()
        .filter(|producer_id| matrix.score(target_user, **producer_id) == 0.0)
        .filter_map(|producer_id| annotate(producers, matrix, *producer_id))
        .collect();
    // producer_ids is ascending, so the stable sort leaves ties in id order
    ranked.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
    ranked.truncate(top_n);
    ranked
}

fn annotate(
    producers: &[Producer],
    matrix: &RatingMatrix,
    producer_id: i64,
) -> Option<RankedProducer> {
    let producer = producers.iter().find(|p| p.id == producer_id)?;
    let mean_rating = matrix.mean_rating(producer_id)?;
    Some(RankedProducer {
        producer: producer.clone(),
        mean_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use chrono::{TimeZone, Utc};

    fn producer(id: i64) -> Producer {
        Producer {
            id,
            name: format!("Produtor {id}"),
            code: format!("P{id}"),
            address: None,
            latitude: None,
            longitude: None,
        }
    }

    fn rating(user_id: i64, producer_id: i64, score: i32) -> Rating {
        Rating {
            user_id,
            producer_id,
            score,
            comment: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn snapshot(ratings: &[Rating]) -> ModelSnapshot {
        let matrix = RatingMatrix::build(ratings);
        match NeighborModel::fit(matrix.clone()) {
            Ok(model) => ModelSnapshot::Fitted(model),
            Err(_) => ModelSnapshot::ColdStart(matrix),
        }
    }

    fn params(neighbor_k: usize, top_n: usize, min_score: i32) -> RecommendParams {
        RecommendParams {
            neighbor_k,
            top_n,
            min_score,
        }
    }

    #[test]
    fn test_neighbor_endorsement_excludes_already_rated() {
        // u2 is u1's nearest neighbor; p1 is already rated by u1
        let ratings = vec![
            rating(1, 1, 5),
            rating(1, 2, 1),
            rating(2, 1, 4),
            rating(2, 3, 5),
        ];
        let producers: Vec<Producer> = (1..=3).map(producer).collect();
        let result = recommend(1, &producers, &snapshot(&ratings), params(2, 10, 4));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].producer.id, 3);
        assert_eq!(result[0].mean_rating, 5.0);
    }

    #[test]
    fn test_min_score_gates_endorsement() {
        let ratings = vec![
            rating(1, 1, 5),
            rating(2, 1, 5),
            rating(2, 2, 2), // below min_score, never endorsed
        ];
        let producers: Vec<Producer> = (1..=2).map(producer).collect();
        let result = recommend(1, &producers, &snapshot(&ratings), params(2, 10, 3));
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_ratings_falls_back_to_empty() {
        let producers: Vec<Producer> = (1..=3).map(producer).collect();
        let result = recommend(1, &producers, &snapshot(&[]), params(5, 10, 3));
        assert!(result.is_empty());
    }

    #[test]
    fn test_unrated_user_gets_popularity_fallback() {
        let ratings = vec![
            rating(1, 1, 2),
            rating(2, 2, 5),
            rating(3, 2, 4),
            rating(3, 3, 3),
        ];
        let producers: Vec<Producer> = (1..=3).map(producer).collect();
        // user 9 has no row in the matrix
        let result = recommend(9, &producers, &snapshot(&ratings), params(5, 2, 3));

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].producer.id, 2);
        assert_eq!(result[0].mean_rating, 4.5);
        assert_eq!(result[1].producer.id, 3);
    }

    #[test]
    fn test_single_user_is_a_cold_start() {
        // One distinct rater cannot support neighbor search; the
        // fallback runs, and it never re-recommends what the target
        // already rated
        let ratings = vec![rating(1, 1, 5), rating(1, 2, 4)];
        let producers: Vec<Producer> = (1..=2).map(producer).collect();
        let snap = snapshot(&ratings);
        assert!(matches!(snap, ModelSnapshot::ColdStart(_)));
        let result = recommend(1, &producers, &snap, params(5, 10, 3));
        assert!(result.is_empty());
        // A different user still gets the popularity ranking
        let result = recommend(2, &producers, &snap, params(5, 10, 3));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].producer.id, 1);
    }

    #[test]
    fn test_output_is_deterministic() {
        let ratings = vec![
            rating(1, 1, 5),
            rating(1, 2, 1),
            rating(2, 1, 4),
            rating(2, 3, 5),
            rating(3, 1, 5),
            rating(3, 4, 5),
            rating(4, 4, 5),
            rating(4, 5, 5),
        ];
        let producers: Vec<Producer> = (1..=5).map(producer).collect();
        let snap = snapshot(&ratings);
        let p = params(3, 10, 3);

        let first = recommend(1, &producers, &snap, p);
        let second = recommend(1, &producers, &snap, p);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ranking_ties_resolve_by_producer_id() {
        let ratings = vec![
            rating(1, 9, 5),
            rating(2, 9, 5),
            rating(2, 5, 4),
            rating(2, 3, 4),
        ];
        let producers = vec![producer(3), producer(5), producer(9)];
        let result = recommend(1, &producers, &snapshot(&ratings), params(2, 10, 4));

        // p3 and p5 both average 4.0; lower id first
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].producer.id, 3);
        assert_eq!(result[1].producer.id, 5);
    }

    #[test]
    fn test_top_n_truncates() {
        let ratings = vec![
            rating(1, 1, 5),
            rating(2, 1, 5),
            rating(2, 2, 5),
            rating(2, 3, 5),
            rating(2, 4, 5),
        ];
        let producers: Vec<Producer> = (1..=4).map(producer).collect();
        let result = recommend(1, &producers, &snapshot(&ratings), params(2, 2, 4));
        assert_eq!(result.len(), 2);
    }
}
