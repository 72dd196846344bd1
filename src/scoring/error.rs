use thiserror::Error;

use crate::constants::DimValidationError;
use crate::embedding::{EmbeddingError, RerankerError};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("reranker error: {0}")]
    Reranker(#[from] RerankerError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("resume vectors have dimension {actual}, catalog expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("expected {expected} resume vectors, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("relevance model returned {actual} scores for {expected} pairs")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("embedder and catalog disagree: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("invalid weight table: {reason}")]
    InvalidWeights { reason: String },
}
