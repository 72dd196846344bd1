//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is fixed by the embedding model and opaque to the scoring
//! pipeline. The resume vectors produced at request time and the posting vectors
//! produced offline must agree; use [`validate_embedding_dim`] at module boundaries
//! (catalog load, pipeline construction) to catch a mismatch at startup instead of
//! deep inside a request.

/// Output dimension of the default sentence-transformer (MiniLM-L6 family).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence embedder per field.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Default size of the coarse shortlist (K).
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

/// Default size of the reranked output.
pub const DEFAULT_FINAL_COUNT: usize = 5;

/// Number of embedded fields per resume.
pub const RESUME_FIELD_COUNT: usize = 6;

/// Number of embedded fields per posting (title, description, requirements).
pub const POSTING_VECTOR_FIELDS: usize = 3;

/// Tolerance for the sum-to-one check on the weight table.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Error returned when two components disagree on the embedding dimension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use recommender::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 || actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
