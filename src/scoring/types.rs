use crate::catalog::Posting;
use crate::constants::RESUME_FIELD_COUNT;
use crate::resume::ResumeField;

use super::error::ScoringError;

/// The six resume vectors, one per [`ResumeField`], in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeVectors {
    vectors: [Vec<f32>; RESUME_FIELD_COUNT],
    dim: usize,
}

impl ResumeVectors {
    /// Wraps exactly six vectors of one shared dimension.
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self, ScoringError> {
        let vectors: [Vec<f32>; RESUME_FIELD_COUNT] =
            vectors
                .try_into()
                .map_err(|v: Vec<Vec<f32>>| ScoringError::FieldCountMismatch {
                    expected: RESUME_FIELD_COUNT,
                    actual: v.len(),
                })?;

        let dim = vectors[0].len();
        if let Some(other) = vectors.iter().find(|v| v.len() != dim) {
            return Err(ScoringError::DimensionMismatch {
                expected: dim,
                actual: other.len(),
            });
        }

        Ok(Self { vectors, dim })
    }

    pub fn field(&self, field: ResumeField) -> &[f32] {
        &self.vectors[field.index()]
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

/// A posting carried through the pipeline with its request-scoped scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPosting {
    pub posting: Posting,
    /// Position of the posting in the catalog.
    pub catalog_index: usize,
    /// Weighted cosine score from the embedding stage.
    pub coarse_score: f32,
    /// Weighted cross-encoder score, set by the reranker.
    pub rerank_score: Option<f32>,
}

impl ScoredPosting {
    pub fn new(posting: Posting, catalog_index: usize, coarse_score: f32) -> Self {
        Self {
            posting,
            catalog_index,
            coarse_score,
            rerank_score: None,
        }
    }

    /// Score from the latest stage that ran.
    pub fn score(&self) -> f32 {
        self.rerank_score.unwrap_or(self.coarse_score)
    }
}
