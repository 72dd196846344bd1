use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::ScoringError;
use crate::embedding::RerankerError;
use super::rerank::RelevanceModel;

/// Relevance model returning preset scores keyed by candidate text.
///
/// Unknown candidates get `default_score`. Every call is counted so tests can assert
/// how often the model was consulted.
#[derive(Debug, Default)]
pub struct MockRelevanceModel {
    scores: HashMap<String, f32>,
    default_score: f32,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockRelevanceModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, candidate: impl Into<String>, score: f32) -> Self {
        self.scores.insert(candidate.into(), score);
        self
    }

    pub fn with_default_score(mut self, score: f32) -> Self {
        self.default_score = score;
        self
    }

    /// Makes every call fail with an inference error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RelevanceModel for MockRelevanceModel {
    fn relevance(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = &self.fail_with {
            return Err(RerankerError::InferenceFailed {
                reason: message.clone(),
            }
            .into());
        }

        Ok(pairs
            .iter()
            .map(|(_, candidate)| {
                self.scores
                    .get(*candidate)
                    .copied()
                    .unwrap_or(self.default_score)
            })
            .collect())
    }

    fn is_stub(&self) -> bool {
        true
    }
}

/// Relevance model that returns the wrong number of scores.
#[derive(Debug, Default)]
pub struct TruncatingRelevanceModel;

impl RelevanceModel for TruncatingRelevanceModel {
    fn relevance(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError> {
        Ok(vec![0.5; pairs.len().saturating_sub(1)])
    }
}
