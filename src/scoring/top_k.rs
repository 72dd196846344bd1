//! Shortlist selection by coarse score.
//!
//! Ordering is total and deterministic: higher score first, NaN after every real
//! score, and equal scores (or two NaNs) by ascending catalog index.

use std::cmp::Ordering;

use crate::catalog::Posting;

use super::error::ScoringError;
use super::types::ScoredPosting;

/// Descending order on scores with NaN sorted last.
pub(crate) fn descending_nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn rank_order(scores: &[f32], a: usize, b: usize) -> Ordering {
    descending_nan_last(scores[a], scores[b]).then(a.cmp(&b))
}

/// Converts a signed request count into K, rejecting negatives.
pub fn top_k_count(requested: i64) -> Result<usize, ScoringError> {
    usize::try_from(requested).map_err(|_| ScoringError::InvalidArgument {
        reason: format!("top-k count must be non-negative, got {requested}"),
    })
}

/// Catalog indices of the best `k` scores, best first. `k > scores.len()` saturates.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();

    if k < order.len() {
        if k > 0 {
            order.select_nth_unstable_by(k - 1, |&a, &b| rank_order(scores, a, b));
        }
        order.truncate(k);
    }

    order.sort_by(|&a, &b| rank_order(scores, a, b));
    order
}

/// Builds the shortlist of the `k` best postings. Neither input is modified.
pub fn select_top_k(
    scores: &[f32],
    k: usize,
    catalog: &[Posting],
) -> Result<Vec<ScoredPosting>, ScoringError> {
    if scores.len() != catalog.len() {
        return Err(ScoringError::InvalidArgument {
            reason: format!(
                "{} scores for a catalog of {} postings",
                scores.len(),
                catalog.len()
            ),
        });
    }

    Ok(top_k_indices(scores, k)
        .into_iter()
        .map(|index| ScoredPosting::new(catalog[index].clone(), index, scores[index]))
        .collect())
}
