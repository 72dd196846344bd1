//! Two-stage posting scoring.
//!
//! The coarse stage ([`CoarseScorer`]) compares precomputed embeddings for every
//! posting in the catalog using a fixed [`WeightTable`] of field pairs.
//! [`select_top_k`] cuts that down to a shortlist, and [`PostingReranker`] rescores
//! the shortlist over the same field pairs with a cross-encoder ([`RelevanceModel`]).
//!
//! The stages are independent: each takes plain inputs and returns fresh values,
//! so they can be exercised separately.

pub mod coarse;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rerank;
pub mod similarity;
pub mod top_k;
pub mod types;
pub mod weights;


pub use coarse::CoarseScorer;
pub use error::ScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockRelevanceModel, TruncatingRelevanceModel};
pub use rerank::{PostingReranker, RelevanceModel};
pub use similarity::cosine_similarity;
pub use top_k::{select_top_k, top_k_count, top_k_indices};
pub use types::{ResumeVectors, ScoredPosting};
pub use weights::{CANONICAL_WEIGHTS, FIELD_PAIR_COUNT, FieldPair, WeightTable};
