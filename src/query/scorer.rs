//! Scoring module for search results
//!
//! Relevance is tiered: an exact title match dominates everything, a
//! title substring match beats text-only matches, and within a tier the
//! text match count breaks ties (log-scaled so long doc-strings don't
//! dominate). Final ordering falls back to the original index order,
//! which is the docs render order.

use serde::{Deserialize, Serialize};

/// Configurable weights for scoring factors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Score for exact (case-insensitive) title equality
    pub exact_title_bonus: f32,
    /// Bonus when a term matches inside the title
    pub title_match_bonus: f32,
    /// Weight applied to the log-scaled text match count
    pub text_match_weight: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_title_bonus: 100.0,
            title_match_bonus: 5.0,
            text_match_weight: 1.0,
        }
    }
}

/// Score calculation context for a single record
#[derive(Debug, Default)]
pub struct ScoreContext {
    /// A query term equals the record title (case-insensitive)
    pub exact_title: bool,
    /// A query term matched inside the title
    pub title_match: bool,
    /// Number of term occurrences in the doc-string text
    pub text_match_count: usize,
    /// Boost multiplier from ^term syntax (default 1.0)
    pub boost: f32,
}

/// Scorer calculates relevance scores for search results
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Create a scorer with default weights
    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Calculate the total score for a record given its context
    pub fn calculate_score(&self, ctx: &ScoreContext) -> f32 {
        let mut score = 0.0;

        if ctx.exact_title {
            score += self.weights.exact_title_bonus;
        }

        if ctx.title_match {
            score += self.weights.title_match_bonus;
        }

        score += self.text_match_score(ctx.text_match_count);

        // Apply boost multiplier (default 1.0 if not set)
        let boost = if ctx.boost > 0.0 { ctx.boost } else { 1.0 };
        score *= boost;

        // Matching records never score zero, so filter-only queries still
        // produce an ordering
        score.max(0.1)
    }

    /// Calculate score contribution from text match count
    fn text_match_score(&self, count: usize) -> f32 {
        // log2(count + 1) gives diminishing returns for more matches
        let log_count = (count as f32 + 1.0).log2();
        log_count * self.weights.text_match_weight
    }

    /// Get the weights (for external calculations)
    #[allow(dead_code)]
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert!(weights.exact_title_bonus > weights.title_match_bonus);
        assert!(weights.title_match_bonus > weights.text_match_weight);
    }

    #[test]
    fn test_exact_title_dominates() {
        let scorer = Scorer::with_defaults();

        let exact = ScoreContext {
            exact_title: true,
            title_match: true,
            ..Default::default()
        };
        let many_text_matches = ScoreContext {
            text_match_count: 500,
            ..Default::default()
        };

        assert!(scorer.calculate_score(&exact) > scorer.calculate_score(&many_text_matches));
    }

    #[test]
    fn test_title_match_beats_text_match() {
        let scorer = Scorer::with_defaults();

        let title = ScoreContext {
            title_match: true,
            ..Default::default()
        };
        let text = ScoreContext {
            text_match_count: 2,
            ..Default::default()
        };

        assert!(scorer.calculate_score(&title) > scorer.calculate_score(&text));
    }

    #[test]
    fn test_more_text_matches_score_higher() {
        let scorer = Scorer::with_defaults();

        let one = ScoreContext {
            text_match_count: 1,
            ..Default::default()
        };
        let ten = ScoreContext {
            text_match_count: 10,
            ..Default::default()
        };

        assert!(scorer.calculate_score(&ten) > scorer.calculate_score(&one));
    }

    #[test]
    fn test_boost_scoring() {
        let scorer = Scorer::with_defaults();

        let plain = ScoreContext {
            title_match: true,
            text_match_count: 1,
            boost: 1.0,
            ..Default::default()
        };
        let boosted = ScoreContext {
            title_match: true,
            text_match_count: 1,
            boost: 2.0,
            ..Default::default()
        };

        let score_plain = scorer.calculate_score(&plain);
        let score_boosted = scorer.calculate_score(&boosted);
        assert!((score_boosted / score_plain - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_match_never_scores_zero() {
        let scorer = Scorer::with_defaults();
        let ctx = ScoreContext::default();
        assert!(scorer.calculate_score(&ctx) >= 0.1);
    }
}
