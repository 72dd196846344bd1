//! First stage: weighted cosine similarity over the whole catalog.

use tracing::debug;

use crate::catalog::{PostingEmbedding, PostingVectors};

use super::error::ScoringError;
use super::similarity::cosine_similarity;
use super::types::ResumeVectors;
use super::weights::WeightTable;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoarseScorer {
    weights: WeightTable,
}

impl CoarseScorer {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Aggregate score of one posting.
    pub fn score_posting(&self, resume: &ResumeVectors, posting: &PostingEmbedding) -> f32 {
        self.weights.weighted_sum(|pair| {
            cosine_similarity(resume.field(pair.resume), posting.field(pair.posting))
        })
    }

    /// One score per posting, in catalog order. An empty catalog yields an empty vector.
    pub fn score_all(
        &self,
        resume: &ResumeVectors,
        postings: &PostingVectors,
    ) -> Result<Vec<f32>, ScoringError> {
        if postings.is_empty() {
            return Ok(Vec::new());
        }

        if resume.dim() != postings.dim() {
            return Err(ScoringError::DimensionMismatch {
                expected: postings.dim(),
                actual: resume.dim(),
            });
        }

        let scores: Vec<f32> = postings
            .rows()
            .iter()
            .map(|posting| self.score_posting(resume, posting))
            .collect();

        debug!(
            postings = scores.len(),
            nan_scores = scores.iter().filter(|s| s.is_nan()).count(),
            "Coarse scoring complete"
        );

        Ok(scores)
    }
}
