use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse postings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("npy error for {path}: {reason}")]
    Npy { path: PathBuf, reason: String },

    #[error("posting vectors must have shape [N, 3, D], got {shape:?}")]
    BadShape { shape: Vec<usize> },

    #[error("posting vector row {row} has dimension {actual}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("catalog has {postings} postings but the vector array has {vectors} rows")]
    Misaligned { postings: usize, vectors: usize },

    #[error("embedding dimension check failed: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("vectorization failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
