use std::sync::Arc;

use super::*;
use crate::catalog::{PostingVectors, vectorize_postings};
use crate::embedding::{Reranker, SentenceConfig};
use crate::scoring::{CANONICAL_WEIGHTS, MockRelevanceModel};

const MATCH_TEXT: &str = "rust backend services";

fn posting(i: usize) -> Posting {
    Posting {
        title: format!("Intern {i}"),
        company: format!("Company {i}"),
        location: "Remote".to_string(),
        description: format!("Work on project number {i}"),
        requirements: format!("Skill set {i}"),
    }
}

fn matching_posting() -> Posting {
    Posting {
        title: MATCH_TEXT.to_string(),
        company: "Ferris Labs".to_string(),
        location: "Berlin".to_string(),
        description: MATCH_TEXT.to_string(),
        requirements: MATCH_TEXT.to_string(),
    }
}

fn matching_resume() -> Resume {
    Resume {
        summary: MATCH_TEXT.to_string(),
        skills: MATCH_TEXT.to_string(),
        education: MATCH_TEXT.to_string(),
        projects: MATCH_TEXT.to_string(),
        experience: MATCH_TEXT.to_string(),
        certifications: MATCH_TEXT.to_string(),
    }
}

/// Eight postings; the matching one sits at index 6.
fn catalog_with(embedder: &SentenceEmbedder) -> Arc<Catalog> {
    let mut postings: Vec<Posting> = (0..8).map(posting).collect();
    postings[6] = matching_posting();
    let vectors = vectorize_postings(&postings, embedder).unwrap();
    Arc::new(Catalog::from_parts(postings, vectors).unwrap())
}

fn recommender(config: RecommenderConfig, relevance: SharedRelevanceModel) -> Recommender {
    let embedder = Arc::new(SentenceEmbedder::stub().unwrap());
    let catalog = catalog_with(&embedder);
    Recommender::new(catalog, embedder, relevance, config).unwrap()
}

fn stub_relevance() -> SharedRelevanceModel {
    Arc::new(Reranker::stub().unwrap())
}

#[test]
fn coarse_only_finds_identical_posting() {
    let config = RecommenderConfig {
        rerank: false,
        ..RecommenderConfig::default()
    };
    let results = recommender(config, stub_relevance())
        .recommend(&matching_resume(), None)
        .unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(results[0].posting.company, "Ferris Labs");
    assert!((results[0].score - 1.0).abs() < 1e-5);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn rerank_reorders_shortlist() {
    let model = MockRelevanceModel::new()
        .with_default_score(0.1)
        .with_score("Work on project number 3", 0.9)
        .with_score("Skill set 3", 0.9)
        .with_score("Intern 3", 0.9);
    let config = RecommenderConfig {
        recommendation_count: 8,
        ..RecommenderConfig::default()
    };
    let results = recommender(config, Arc::new(model))
        .recommend(&matching_resume(), None)
        .unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(results[0].posting.title, "Intern 3");
    assert!((results[0].score - 0.9).abs() < 1e-6);
}

#[test]
fn count_override_limits_shortlist() {
    let results = recommender(RecommenderConfig::default(), stub_relevance())
        .recommend(&matching_resume(), Some(2))
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn count_above_catalog_saturates() {
    let config = RecommenderConfig {
        rerank: false,
        ..RecommenderConfig::default()
    };
    let results = recommender(config, stub_relevance())
        .recommend(&matching_resume(), Some(100))
        .unwrap();
    assert_eq!(results.len(), 8);
}

#[test]
fn rerank_truncates_to_final_count() {
    let config = RecommenderConfig {
        recommendation_count: 8,
        final_count: 3,
        rerank: true,
    };
    let results = recommender(config, stub_relevance())
        .recommend(&matching_resume(), None)
        .unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn zero_count_returns_nothing() {
    let results = recommender(RecommenderConfig::default(), stub_relevance())
        .recommend(&matching_resume(), Some(0))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn negative_count_is_rejected() {
    let err = recommender(RecommenderConfig::default(), stub_relevance())
        .recommend(&matching_resume(), Some(-3))
        .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidArgument { .. }));
}

#[test]
fn relevance_failure_propagates() {
    let err = recommender(
        RecommenderConfig::default(),
        Arc::new(MockRelevanceModel::failing("cross-encoder crashed")),
    )
    .recommend(&matching_resume(), None)
    .unwrap_err();
    assert!(err.to_string().contains("cross-encoder crashed"));
}

#[test]
fn empty_catalog_returns_nothing() {
    let embedder = Arc::new(SentenceEmbedder::stub().unwrap());
    let catalog = Arc::new(Catalog::from_parts(Vec::new(), PostingVectors::empty(0)).unwrap());
    let recommender = Recommender::new(
        catalog,
        embedder,
        stub_relevance(),
        RecommenderConfig::default(),
    )
    .unwrap();

    assert!(
        recommender
            .recommend(&matching_resume(), None)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn rejects_dimension_mismatch_at_construction() {
    let catalog = catalog_with(&SentenceEmbedder::stub().unwrap());
    let narrow = SentenceEmbedder::load(SentenceConfig::stub().with_embedding_dim(16)).unwrap();

    let err = Recommender::new(
        catalog,
        Arc::new(narrow),
        stub_relevance(),
        RecommenderConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ScoringError::Dimension(_)));
}

#[test]
fn rejects_invalid_weights_at_construction() {
    let embedder = Arc::new(SentenceEmbedder::stub().unwrap());
    let catalog = catalog_with(&embedder);
    let mut pairs = [CANONICAL_WEIGHTS.pairs()[0]; 10];
    pairs.copy_from_slice(CANONICAL_WEIGHTS.pairs());
    pairs[9].weight = 0.5;

    let err = Recommender::with_weights(
        catalog,
        embedder,
        stub_relevance(),
        RecommenderConfig::default(),
        WeightTable::from_pairs(pairs),
    )
    .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidWeights { .. }));
}

#[test]
fn recommendation_serializes_flat() {
    let recommendation = Recommendation {
        posting: matching_posting(),
        score: 0.5,
    };
    let value = serde_json::to_value(&recommendation).unwrap();
    assert_eq!(value["company"], "Ferris Labs");
    assert_eq!(value["score"], 0.5);
    assert!(value.get("posting").is_none());
}

#[test]
fn nan_score_round_trips_through_null() {
    let recommendation = Recommendation {
        posting: matching_posting(),
        score: f32::NAN,
    };
    let json = serde_json::to_string(&recommendation).unwrap();
    assert!(json.contains("\"score\":null"));

    let parsed: Recommendation = serde_json::from_str(&json).unwrap();
    assert!(parsed.score.is_nan());
    assert_eq!(parsed.posting, recommendation.posting);
}
