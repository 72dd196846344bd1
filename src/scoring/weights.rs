//! Field-pair weight table shared by the coarse and fine stages.

use crate::catalog::PostingField;
use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::resume::ResumeField;

use super::error::ScoringError;

pub const FIELD_PAIR_COUNT: usize = 10;

/// One comparison: a resume field against a posting field, and its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPair {
    pub resume: ResumeField,
    pub posting: PostingField,
    pub weight: f32,
}

impl FieldPair {
    pub const fn new(resume: ResumeField, posting: PostingField, weight: f32) -> Self {
        Self {
            resume,
            posting,
            weight,
        }
    }
}

/// Ordered set of field pairs whose weights sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
    pairs: [FieldPair; FIELD_PAIR_COUNT],
}

/// The production table. Checked by [`WeightTable::validate`] at startup.
pub const CANONICAL_WEIGHTS: WeightTable = WeightTable::from_pairs([
    FieldPair::new(ResumeField::Skills, PostingField::Requirements, 0.25),
    FieldPair::new(ResumeField::Experience, PostingField::Description, 0.20),
    FieldPair::new(ResumeField::Projects, PostingField::Description, 0.15),
    FieldPair::new(ResumeField::Experience, PostingField::Requirements, 0.10),
    FieldPair::new(ResumeField::Skills, PostingField::Description, 0.10),
    FieldPair::new(ResumeField::Summary, PostingField::Description, 0.05),
    FieldPair::new(ResumeField::Summary, PostingField::Title, 0.05),
    FieldPair::new(ResumeField::Education, PostingField::Requirements, 0.05),
    FieldPair::new(ResumeField::Certifications, PostingField::Requirements, 0.04),
    FieldPair::new(ResumeField::Certifications, PostingField::Description, 0.01),
]);

impl Default for WeightTable {
    fn default() -> Self {
        CANONICAL_WEIGHTS
    }
}

impl WeightTable {
    /// Builds a table without checking it; call [`validate`](Self::validate) before use.
    pub const fn from_pairs(pairs: [FieldPair; FIELD_PAIR_COUNT]) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    /// Sum of all weights, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.pairs.iter().map(|p| f64::from(p.weight)).sum()
    }

    /// Weights must be finite, non-negative and sum to 1.0 within tolerance.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if let Some(pair) = self
            .pairs
            .iter()
            .find(|p| !p.weight.is_finite() || p.weight < 0.0)
        {
            return Err(ScoringError::InvalidWeights {
                reason: format!(
                    "{}/{} has weight {}",
                    pair.resume, pair.posting, pair.weight
                ),
            });
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights {
                reason: format!("weights sum to {sum}, expected 1.0"),
            });
        }

        Ok(())
    }

    /// `Σ weight · similarity(pair)` over all pairs, in table order.
    pub fn weighted_sum<F>(&self, mut similarity: F) -> f32
    where
        F: FnMut(&FieldPair) -> f32,
    {
        self.pairs.iter().map(|p| p.weight * similarity(p)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_weights_sum_to_one() {
        assert!((CANONICAL_WEIGHTS.sum() - 1.0).abs() < 1e-6);
        assert!(CANONICAL_WEIGHTS.validate().is_ok());
    }

    #[test]
    fn canonical_weights_have_no_duplicate_pairs() {
        let pairs = CANONICAL_WEIGHTS.pairs();
        for (i, a) in pairs.iter().enumerate() {
            for b in &pairs[i + 1..] {
                assert!(
                    (a.resume, a.posting) != (b.resume, b.posting),
                    "duplicate pair {}/{}",
                    a.resume,
                    a.posting
                );
            }
        }
    }

    #[test]
    fn heaviest_pair_is_skills_requirements() {
        let first = CANONICAL_WEIGHTS.pairs()[0];
        assert_eq!(first.resume, ResumeField::Skills);
        assert_eq!(first.posting, PostingField::Requirements);
        assert_eq!(first.weight, 0.25);
    }

    #[test]
    fn validate_rejects_bad_sum() {
        let mut pairs = CANONICAL_WEIGHTS.pairs;
        pairs[0].weight = 0.30;
        let err = WeightTable::from_pairs(pairs).validate().unwrap_err();
        assert!(err.to_string().contains("expected 1.0"));
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let mut pairs = CANONICAL_WEIGHTS.pairs;
        pairs[0].weight = 0.35;
        pairs[1].weight = -0.10;
        let err = WeightTable::from_pairs(pairs).validate().unwrap_err();
        assert!(err.to_string().contains("experience/description"));
    }

    #[test]
    fn weighted_sum_of_ones_is_weight_sum() {
        let total = CANONICAL_WEIGHTS.weighted_sum(|_| 1.0);
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn weighted_sum_isolates_pairs() {
        let only_titles = CANONICAL_WEIGHTS.weighted_sum(|p| {
            if p.posting == PostingField::Title {
                1.0
            } else {
                0.0
            }
        });
        assert!((only_titles - 0.05).abs() < 1e-7);
    }
}
