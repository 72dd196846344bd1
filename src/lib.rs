//! Internship recommender library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Resume`], [`Posting`], [`Catalog`] - Request and catalog data
//! - [`Recommender`], [`Recommendation`] - The end-to-end pipeline
//! - [`Config`], [`ConfigError`] - Server configuration
//!
//! ## Scoring
//! - [`CoarseScorer`] - Weighted cosine similarity over the whole catalog
//! - [`select_top_k`] - Shortlist selection
//! - [`PostingReranker`], [`RelevanceModel`] - Cross-encoder reranking
//! - [`CANONICAL_WEIGHTS`] - The field-pair weight table
//!
//! ## Embedding
//! - [`SentenceEmbedder`], [`SentenceConfig`] - Resume and posting vectors
//! - [`Reranker`], [`RerankerConfig`] - Cross-encoder
//!
//! ## Test/Mock Support
//! Mock relevance models are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod recommend;
pub mod resume;
pub mod scoring;

pub use catalog::{Catalog, CatalogError, Posting, PostingField, PostingVectors};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbeddingError, Reranker, RerankerConfig, RerankerError, ScoreActivation, SentenceConfig,
    SentenceEmbedder,
};
pub use gateway::{
    HandlerState, RECOMMENDER_STATUS_HEADER, RECOMMENDER_STATUS_HEALTHY, RECOMMENDER_STATUS_READY,
    create_router_with_state,
};
pub use recommend::{Recommendation, Recommender, RecommenderConfig, SharedRelevanceModel};
pub use resume::{Resume, ResumeField};
#[cfg(any(test, feature = "mock"))]
pub use scoring::MockRelevanceModel;
pub use scoring::{
    CANONICAL_WEIGHTS, CoarseScorer, PostingReranker, RelevanceModel, ScoredPosting, ScoringError,
    WeightTable, cosine_similarity, select_top_k,
};
