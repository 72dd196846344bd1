//! End-to-end recommendation: embed the resume, score the catalog, shortlist, rerank.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::catalog::{Catalog, Posting};
use crate::constants::{DEFAULT_FINAL_COUNT, DEFAULT_RECOMMENDATION_COUNT, validate_embedding_dim};
use crate::embedding::SentenceEmbedder;
use crate::resume::Resume;
use crate::scoring::{
    CoarseScorer, PostingReranker, RelevanceModel, ResumeVectors, ScoredPosting, ScoringError,
    WeightTable, select_top_k, top_k_count,
};

/// Pipeline knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderConfig {
    /// Shortlist size (K) when the request does not override it.
    pub recommendation_count: usize,
    /// Maximum number of reranked results.
    pub final_count: usize,
    /// Whether the cross-encoder stage runs.
    pub rerank: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            recommendation_count: DEFAULT_RECOMMENDATION_COUNT,
            final_count: DEFAULT_FINAL_COUNT,
            rerank: true,
        }
    }
}

/// One ranked posting as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub posting: Posting,
    /// Final-stage score. A NaN score (degenerate similarity) is written as JSON
    /// `null` and read back as NaN.
    #[serde(deserialize_with = "nan_from_null")]
    pub score: f32,
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}

impl From<ScoredPosting> for Recommendation {
    fn from(scored: ScoredPosting) -> Self {
        let score = scored.score();
        Self {
            posting: scored.posting,
            score,
        }
    }
}

pub type SharedRelevanceModel = Arc<dyn RelevanceModel + Send + Sync>;

pub struct Recommender {
    catalog: Arc<Catalog>,
    embedder: Arc<SentenceEmbedder>,
    relevance: SharedRelevanceModel,
    coarse: CoarseScorer,
    reranker: PostingReranker,
    config: RecommenderConfig,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("postings", &self.catalog.len())
            .field("embedder", &self.embedder)
            .field("relevance_stub", &self.relevance.is_stub())
            .field("config", &self.config)
            .finish()
    }
}

impl Recommender {
    /// Builds the pipeline with the canonical weight table.
    pub fn new(
        catalog: Arc<Catalog>,
        embedder: Arc<SentenceEmbedder>,
        relevance: SharedRelevanceModel,
        config: RecommenderConfig,
    ) -> Result<Self, ScoringError> {
        Self::with_weights(catalog, embedder, relevance, config, WeightTable::default())
    }

    /// Validates `weights` and the embedder/catalog dimension before building.
    pub fn with_weights(
        catalog: Arc<Catalog>,
        embedder: Arc<SentenceEmbedder>,
        relevance: SharedRelevanceModel,
        config: RecommenderConfig,
        weights: WeightTable,
    ) -> Result<Self, ScoringError> {
        weights.validate()?;

        if !catalog.is_empty() {
            validate_embedding_dim(embedder.embedding_dim(), catalog.dim())?;
        }

        info!(
            postings = catalog.len(),
            dim = catalog.dim(),
            embedder_stub = embedder.is_stub(),
            reranker_stub = relevance.is_stub(),
            recommendation_count = config.recommendation_count,
            final_count = config.final_count,
            rerank = config.rerank,
            "Recommender ready"
        );

        Ok(Self {
            catalog,
            embedder,
            relevance,
            coarse: CoarseScorer::new(weights),
            reranker: PostingReranker::new(weights, config.final_count),
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn embedder(&self) -> &SentenceEmbedder {
        &self.embedder
    }

    pub fn relevance_model(&self) -> &(dyn RelevanceModel + Send + Sync) {
        self.relevance.as_ref()
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Embeds the six resume fields in field order.
    pub fn embed_resume(&self, resume: &Resume) -> Result<ResumeVectors, ScoringError> {
        let vectors = self.embedder.embed_batch(&resume.texts())?;
        ResumeVectors::new(vectors)
    }

    /// Ranks the catalog for `resume`. `count` overrides K and must not be negative.
    #[instrument(skip(self, resume), fields(postings = self.catalog.len()))]
    pub fn recommend(
        &self,
        resume: &Resume,
        count: Option<i64>,
    ) -> Result<Vec<Recommendation>, ScoringError> {
        let k = match count {
            Some(requested) => top_k_count(requested)?,
            None => self.config.recommendation_count,
        };

        let started = Instant::now();
        let resume_vectors = self.embed_resume(resume)?;
        let embed_ms = started.elapsed().as_millis() as u64;

        let stage = Instant::now();
        let scores = self.coarse.score_all(&resume_vectors, self.catalog.vectors())?;
        let shortlist = select_top_k(&scores, k, self.catalog.postings())?;
        debug!(
            k,
            shortlisted = shortlist.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Coarse stage complete"
        );

        let ranked = if self.config.rerank {
            let stage = Instant::now();
            let ranked = self
                .reranker
                .rerank(resume, shortlist, self.relevance.as_ref())?;
            debug!(
                kept = ranked.len(),
                elapsed_ms = stage.elapsed().as_millis() as u64,
                "Rerank stage complete"
            );
            ranked
        } else {
            shortlist
        };

        info!(
            k,
            returned = ranked.len(),
            reranked = self.config.rerank,
            embed_ms,
            total_ms = started.elapsed().as_millis() as u64,
            "Recommendation complete"
        );

        Ok(ranked.into_iter().map(Recommendation::from).collect())
    }
}
