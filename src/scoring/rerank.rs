//! Second stage: cross-encoder reranking of the shortlist.
//!
//! Each shortlisted posting is scored again over the same field pairs and weights
//! used by the coarse stage, but on raw text through a [`RelevanceModel`]. All pairs
//! for a request go to the model in one call.

use tracing::debug;

use crate::constants::DEFAULT_FINAL_COUNT;
use crate::embedding::Reranker;
use crate::resume::Resume;

use super::error::ScoringError;
use super::top_k::descending_nan_last;
use super::types::ScoredPosting;
use super::weights::{FIELD_PAIR_COUNT, WeightTable};

/// Pairwise relevance between a query text and a candidate text.
pub trait RelevanceModel {
    /// One score per `(query, candidate)` pair, in input order.
    fn relevance(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError>;

    /// True when scores come from a placeholder rather than a trained model.
    fn is_stub(&self) -> bool {
        false
    }
}

impl RelevanceModel for Reranker {
    fn relevance(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError> {
        Ok(self.score_pairs(pairs)?)
    }

    fn is_stub(&self) -> bool {
        !self.is_model_loaded()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PostingReranker {
    weights: WeightTable,
    final_count: usize,
}

impl Default for PostingReranker {
    fn default() -> Self {
        Self::new(WeightTable::default(), DEFAULT_FINAL_COUNT)
    }
}

impl PostingReranker {
    pub fn new(weights: WeightTable, final_count: usize) -> Self {
        Self {
            weights,
            final_count,
        }
    }

    pub fn final_count(&self) -> usize {
        self.final_count
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Weighted relevance of a single posting.
    pub fn score_posting<M>(
        &self,
        resume: &Resume,
        candidate: &ScoredPosting,
        model: &M,
    ) -> Result<f32, ScoringError>
    where
        M: RelevanceModel + ?Sized,
    {
        let pairs = self.text_pairs(resume, candidate);
        let scores = checked_relevance(model, &pairs)?;
        Ok(self.combine(&scores))
    }

    /// Rescores `shortlist`, sorts it by the new score and keeps the first `final_count`.
    ///
    /// Ties (including NaN against NaN) keep their shortlist order.
    pub fn rerank<M>(
        &self,
        resume: &Resume,
        shortlist: Vec<ScoredPosting>,
        model: &M,
    ) -> Result<Vec<ScoredPosting>, ScoringError>
    where
        M: RelevanceModel + ?Sized,
    {
        if shortlist.is_empty() {
            return Ok(shortlist);
        }

        let pairs: Vec<(&str, &str)> = shortlist
            .iter()
            .flat_map(|candidate| self.text_pairs(resume, candidate))
            .collect();
        let scores = checked_relevance(model, &pairs)?;

        let mut ranked: Vec<(usize, ScoredPosting)> = shortlist
            .into_iter()
            .zip(scores.chunks_exact(FIELD_PAIR_COUNT))
            .map(|(mut candidate, chunk)| {
                candidate.rerank_score = Some(self.combine(chunk));
                candidate
            })
            .enumerate()
            .collect();

        ranked.sort_by(|(rank_a, a), (rank_b, b)| {
            descending_nan_last(a.score(), b.score()).then(rank_a.cmp(rank_b))
        });
        ranked.truncate(self.final_count);

        debug!(
            kept = ranked.len(),
            final_count = self.final_count,
            top_score = ranked.first().map(|(_, c)| c.score()),
            "Rerank complete"
        );

        Ok(ranked.into_iter().map(|(_, candidate)| candidate).collect())
    }

    fn text_pairs<'a>(
        &self,
        resume: &'a Resume,
        candidate: &'a ScoredPosting,
    ) -> [(&'a str, &'a str); FIELD_PAIR_COUNT] {
        let pairs = self.weights.pairs();
        std::array::from_fn(|i| {
            (
                resume.field(pairs[i].resume),
                candidate.posting.field(pairs[i].posting),
            )
        })
    }

    fn combine(&self, scores: &[f32]) -> f32 {
        let mut iter = scores.iter().copied();
        self.weights
            .weighted_sum(|_| iter.next().unwrap_or(f32::NAN))
    }
}

fn checked_relevance<M>(model: &M, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError>
where
    M: RelevanceModel + ?Sized,
{
    let scores = model.relevance(pairs)?;
    if scores.len() != pairs.len() {
        return Err(ScoringError::ScoreCountMismatch {
            expected: pairs.len(),
            actual: scores.len(),
        });
    }
    Ok(scores)
}
