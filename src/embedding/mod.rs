//! Embedding + model utilities.
//!
//! - [`sentence`] turns resume and posting fields into vectors.
//! - [`reranker`] is the cross-encoder used by [`crate::scoring::rerank`].

/// BERT encoder and classifier wrappers.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Cross-encoder relevance model.
pub mod reranker;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use reranker::{Reranker, RerankerConfig, RerankerError, ScoreActivation};
pub use sentence::{SentenceConfig, SentenceEmbedder};
